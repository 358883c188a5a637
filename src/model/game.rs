use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules::{Comparator, ConditionalRule, Operation, StatementRule, Transition};
use super::state::State;
use super::EntityId;

/// Value of a single card field, as seen by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(i32),
}

impl FieldValue<'_> {
    /// Empty text and zero both count as "not filled in".
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Number(value) => *value == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontField {
    Title,
    Art,
    Description,
    Effect,
    Cost,
    Level,
    Earning,
}

impl FrontField {
    pub const ALL: [FrontField; 7] = [
        FrontField::Title,
        FrontField::Art,
        FrontField::Description,
        FrontField::Effect,
        FrontField::Cost,
        FrontField::Level,
        FrontField::Earning,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FrontField::Title => "title",
            FrontField::Art => "art",
            FrontField::Description => "description",
            FrontField::Effect => "effect",
            FrontField::Cost => "cost",
            FrontField::Level => "level",
            FrontField::Earning => "earning",
        }
    }
}

impl fmt::Display for FrontField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackField {
    Title,
    Answers,
    Effect,
    Cost,
    Level,
    Earning,
}

impl BackField {
    pub const ALL: [BackField; 6] = [
        BackField::Title,
        BackField::Answers,
        BackField::Effect,
        BackField::Cost,
        BackField::Level,
        BackField::Earning,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BackField::Title => "title",
            BackField::Answers => "answers",
            BackField::Effect => "effect",
            BackField::Cost => "cost",
            BackField::Level => "level",
            BackField::Earning => "earning",
        }
    }
}

impl fmt::Display for BackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardFront {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub art: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub earning: i32,
}

impl CardFront {
    pub fn field(&self, field: FrontField) -> FieldValue<'_> {
        match field {
            FrontField::Title => FieldValue::Text(&self.title),
            FrontField::Art => FieldValue::Text(&self.art),
            FrontField::Description => FieldValue::Text(&self.description),
            FrontField::Effect => FieldValue::Text(&self.effect),
            FrontField::Cost => FieldValue::Number(self.cost),
            FrontField::Level => FieldValue::Number(self.level),
            FrontField::Earning => FieldValue::Number(self.earning),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardBack {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub answers: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub earning: i32,
}

impl CardBack {
    pub fn field(&self, field: BackField) -> FieldValue<'_> {
        match field {
            BackField::Title => FieldValue::Text(&self.title),
            BackField::Answers => FieldValue::Text(&self.answers),
            BackField::Effect => FieldValue::Text(&self.effect),
            BackField::Cost => FieldValue::Number(self.cost),
            BackField::Level => FieldValue::Number(self.level),
            BackField::Earning => FieldValue::Number(self.earning),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub deck: EntityId,
    #[serde(default = "default_repetitions")]
    pub repetitions: i32,
    #[serde(default)]
    pub card_front: CardFront,
    #[serde(default)]
    pub card_back: CardBack,
}

fn default_repetitions() -> i32 {
    1
}

impl Default for Card {
    fn default() -> Self {
        Self {
            id: None,
            deck: None,
            repetitions: default_repetitions(),
            card_front: CardFront::default(),
            card_back: CardBack::default(),
        }
    }
}

impl Card {
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.card_front.title = title.into();
        self
    }

    pub fn with_repetitions(mut self, repetitions: i32) -> Self {
        self.repetitions = repetitions;
        self
    }
}

/// Which front fields a deck requires its cards to fill in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FrontSchema {
    #[serde(default)]
    pub title: bool,
    #[serde(default)]
    pub art: bool,
    #[serde(default)]
    pub description: bool,
    #[serde(default)]
    pub effect: bool,
    #[serde(default)]
    pub cost: bool,
    #[serde(default)]
    pub level: bool,
    #[serde(default)]
    pub earning: bool,
}

impl FrontSchema {
    pub fn requires(&self, field: FrontField) -> bool {
        match field {
            FrontField::Title => self.title,
            FrontField::Art => self.art,
            FrontField::Description => self.description,
            FrontField::Effect => self.effect,
            FrontField::Cost => self.cost,
            FrontField::Level => self.level,
            FrontField::Earning => self.earning,
        }
    }
}

/// Which back fields a deck requires its cards to fill in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackSchema {
    #[serde(default)]
    pub title: bool,
    #[serde(default)]
    pub answers: bool,
    #[serde(default)]
    pub effect: bool,
    #[serde(default)]
    pub cost: bool,
    #[serde(default)]
    pub level: bool,
    #[serde(default)]
    pub earning: bool,
}

impl BackSchema {
    pub fn requires(&self, field: BackField) -> bool {
        match field {
            BackField::Title => self.title,
            BackField::Answers => self.answers,
            BackField::Effect => self.effect,
            BackField::Cost => self.cost,
            BackField::Level => self.level,
            BackField::Earning => self.earning,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deck_front: FrontSchema,
    #[serde(default)]
    pub deck_back: BackSchema,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Aggregate root: a game owns its decks and its state graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub states: Vec<State>,
}

impl Game {
    pub fn deck(&self, index: usize) -> Option<&Deck> {
        self.decks.get(index)
    }

    pub fn deck_mut(&mut self, index: usize) -> Option<&mut Deck> {
        self.decks.get_mut(index)
    }

    pub fn state(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    /// A small but complete game, handy for front-end bootstrapping and tests.
    pub fn sample() -> Self {
        let game_id = Some("g1".to_string());

        let questions = Deck {
            id: Some("d1".into()),
            name: "Questions".into(),
            deck_front: FrontSchema {
                title: true,
                description: true,
                ..FrontSchema::default()
            },
            deck_back: BackSchema {
                answers: true,
                ..BackSchema::default()
            },
            cards: vec![
                Card {
                    id: Some("c1".into()),
                    deck: Some("d1".into()),
                    repetitions: 2,
                    card_front: CardFront {
                        title: "Capital".into(),
                        description: "Name the capital of France".into(),
                        cost: 1,
                        ..CardFront::default()
                    },
                    card_back: CardBack {
                        answers: "Paris".into(),
                        earning: 3,
                        ..CardBack::default()
                    },
                },
                Card {
                    id: Some("c2".into()),
                    deck: Some("d1".into()),
                    repetitions: 1,
                    card_front: CardFront {
                        title: "River".into(),
                        description: "Name the longest river".into(),
                        cost: 2,
                        ..CardFront::default()
                    },
                    card_back: CardBack {
                        answers: "Nile".into(),
                        earning: 5,
                        ..CardBack::default()
                    },
                },
            ],
        };

        let events = Deck {
            id: Some("d2".into()),
            name: "Events".into(),
            deck_front: FrontSchema {
                title: true,
                effect: true,
                cost: true,
                ..FrontSchema::default()
            },
            deck_back: BackSchema::default(),
            cards: vec![Card {
                id: Some("c3".into()),
                deck: Some("d2".into()),
                repetitions: 4,
                card_front: CardFront {
                    title: "Windfall".into(),
                    effect: "gain 2 coins".into(),
                    cost: 1,
                    ..CardFront::default()
                },
                card_back: CardBack::default(),
            }],
        };

        let state = |id: &str, label: &str, x: f64| State {
            id: Some(id.into()),
            game: game_id.clone(),
            color: "#dedede".into(),
            label: label.into(),
            purpose: String::new(),
            conditional_rule: None,
            statement_rules: Vec::new(),
            transition: None,
            width: 160.0,
            height: 80.0,
            x,
            y: 30.0,
        };

        let start =
            state("s0", "Game Start", 30.0).with_transition(Transition::new("begin").with_target("s1"));
        let mut draw =
            state("s1", "Draw", 230.0).with_transition(Transition::new("answer").with_target("s2"));
        draw.purpose = "Draw a question card".into();
        draw.statement_rules.push(StatementRule::new("hand", Operation::Add, "1"));
        let mut score = state("s2", "Score", 430.0).with_conditional_rule(
            ConditionalRule::new("score", Comparator::Ge, "10").with_branches("s3", "s1"),
        );
        score.purpose = "Check whether somebody won".into();
        let over = state("s3", "Game Over", 630.0);

        Game {
            id: game_id,
            name: "Trivia Night".into(),
            decks: vec![questions, events],
            states: vec![start, draw, score, over],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_values() {
        assert!(FieldValue::Text("").is_blank());
        assert!(FieldValue::Number(0).is_blank());
        assert!(!FieldValue::Text("x").is_blank());
        assert!(!FieldValue::Number(-1).is_blank());
    }

    #[test]
    fn deck_schema_reads_flag_maps() {
        let json = r#"{
            "_id": "d9",
            "deckFront": {"title": true, "cost": true},
            "deckBack": {"answers": true}
        }"#;
        let deck: Deck = serde_json::from_str(json).expect("deck should parse");
        assert!(deck.deck_front.requires(FrontField::Title));
        assert!(deck.deck_front.requires(FrontField::Cost));
        assert!(!deck.deck_front.requires(FrontField::Level));
        assert!(deck.deck_back.requires(BackField::Answers));
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn card_defaults_to_one_repetition() {
        let card: Card = serde_json::from_str(r#"{"cardFront": {"title": "A"}}"#)
            .expect("card should parse");
        assert_eq!(card.repetitions, 1);
        assert!(card.is_draft());
        assert_eq!(card.card_front.field(FrontField::Title), FieldValue::Text("A"));
    }

    #[test]
    fn sample_game_round_trips_through_json() {
        let game = Game::sample();
        let json = serde_json::to_string(&game).expect("game should serialize");
        assert!(json.contains("\"_id\":\"g1\""));
        assert!(json.contains("\"statementRules\""));
        let back: Game = serde_json::from_str(&json).expect("game should parse");
        assert_eq!(back, game);
    }
}
