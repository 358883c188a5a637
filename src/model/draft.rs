//! Factories for draft entities: blank ones, or copies seeded from an existing entity.
//!
//! A draft always has `id == None`, so saving it creates a new record instead of
//! overwriting its source.

use super::game::{Card, Game};
use super::state::State;
use crate::config::DraftDefaults;

pub fn draft_state(game: &Game, source: Option<usize>, defaults: &DraftDefaults) -> State {
    let mut state = State {
        id: None,
        game: game.id.clone(),
        color: defaults.color.clone(),
        label: String::new(),
        purpose: String::new(),
        conditional_rule: None,
        statement_rules: Vec::new(),
        transition: None,
        width: defaults.width,
        height: defaults.height,
        x: defaults.x,
        y: defaults.y,
    };

    if let Some(origin) = source.and_then(|index| game.state(index)) {
        state.label = origin.label.clone();
        state.purpose = origin.purpose.clone();
        state.conditional_rule = origin.conditional_rule.clone();
        state.statement_rules = origin.statement_rules.clone();
        state.transition = origin.transition.clone();
    }

    state
}

pub fn draft_card(game: &Game, deck_index: Option<usize>, source: Option<usize>) -> Card {
    let deck = deck_index.and_then(|index| game.deck(index));
    let mut card = Card {
        deck: deck.and_then(|deck| deck.id.clone()),
        ..Card::default()
    };

    if let Some(origin) = deck.zip(source).and_then(|(deck, index)| deck.cards.get(index)) {
        card.repetitions = origin.repetitions;
        card.card_front = origin.card_front.clone();
        card.card_back = origin.card_back.clone();
    }

    card
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_state_uses_default_geometry() {
        let game = Game::sample();
        let defaults = DraftDefaults::default();

        let first = draft_state(&game, None, &defaults);
        let second = draft_state(&game, None, &defaults);

        assert_eq!(first, second);
        assert!(first.id.is_none());
        assert_eq!(first.game.as_deref(), Some("g1"));
        assert_eq!((first.width, first.height), (160.0, 80.0));
        assert_eq!((first.x, first.y), (30.0, 30.0));
        assert_eq!(first.color, "#dedede");
        assert!(first.label.is_empty());
        assert!(!first.has_exit());
    }

    #[test]
    fn out_of_bounds_source_gives_blank_state() {
        let game = Game::sample();
        let defaults = DraftDefaults::default();
        assert_eq!(
            draft_state(&game, Some(game.states.len()), &defaults),
            draft_state(&game, None, &defaults)
        );
    }

    #[test]
    fn copied_state_keeps_rules_but_not_identity() {
        let game = Game::sample();
        let source = &game.states[2];
        let copy = draft_state(&game, Some(2), &DraftDefaults::default());

        assert!(copy.id.is_none());
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.label, source.label);
        assert_eq!(copy.purpose, source.purpose);
        assert_eq!(copy.conditional_rule, source.conditional_rule);
        assert_eq!(copy.statement_rules, source.statement_rules);
        assert_eq!(copy.transition, source.transition);
    }

    #[test]
    fn blank_card_belongs_to_selected_deck() {
        let game = Game::sample();
        let card = draft_card(&game, Some(1), None);

        assert!(card.id.is_none());
        assert_eq!(card.deck.as_deref(), Some("d2"));
        assert_eq!(card.repetitions, 1);
        assert_eq!(card.card_front, crate::model::CardFront::default());
        assert_eq!(draft_card(&game, Some(1), None), card);
    }

    #[test]
    fn copied_card_keeps_faces_but_not_identity() {
        let game = Game::sample();
        let source = &game.decks[0].cards[1];
        let copy = draft_card(&game, Some(0), Some(1));

        assert!(copy.id.is_none());
        assert_eq!(copy.repetitions, source.repetitions);
        assert_eq!(copy.card_front, source.card_front);
        assert_eq!(copy.card_back, source.card_back);
    }

    #[test]
    fn card_without_deck_has_no_owner() {
        let game = Game::default();
        let card = draft_card(&game, Some(0), Some(0));
        assert!(card.deck.is_none());
        assert_eq!(card, Card::default());
    }
}
