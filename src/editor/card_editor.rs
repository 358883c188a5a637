use crate::api::{Alert, ApiError, CardApi};
use crate::config::EditorConfig;
use crate::model::{draft_card, Card, Deck, Game};
use crate::validation::{validate_card, ValidationIssue};

use super::selection::Selection;
use super::{
    reject_busy, reject_invalid, report_remote_failure, store_saved, EditorContext, EditorError,
    SaveError, SaveTarget,
};

/// A validated card on its way to the API, together with the deck it goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCard {
    pub deck_index: usize,
    pub draft: Card,
    pub target: SaveTarget,
}

impl PendingCard {
    pub async fn dispatch<A>(&self, api: &A) -> Result<Card, ApiError>
    where
        A: CardApi + ?Sized,
    {
        match self.target {
            SaveTarget::Create => api.create_card(&self.draft).await,
            SaveTarget::Update { .. } => api.update_card(&self.draft).await,
        }
    }
}

/// Editing session over the decks and cards of a game.
#[derive(Debug, Clone)]
pub struct CardEditor {
    config: EditorConfig,
    deck_index: Option<usize>,
    selection: Selection,
    draft: Card,
    show_back: bool,
    saving: bool,
}

impl CardEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            deck_index: None,
            selection: Selection::Idle,
            draft: Card::default(),
            show_back: false,
            saving: false,
        }
    }

    /// Binds the editor to a freshly loaded game and opens its first deck.
    ///
    /// Refused while a save is outstanding, since its answer targets the old game.
    pub fn load(&mut self, game: &Game, ctx: &EditorContext<'_>) -> Result<(), EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        self.deck_index = None;
        self.show_back = false;
        if game.decks.is_empty() {
            log::debug!("game {:?} has no decks yet", game.id);
            self.reset_draft(game);
            return Ok(());
        }
        self.select_deck(game, 0, ctx)
    }

    pub fn deck_index(&self) -> Option<usize> {
        self.deck_index
    }

    pub fn deck<'g>(&self, game: &'g Game) -> Option<&'g Deck> {
        self.deck_index.and_then(|index| game.deck(index))
    }

    pub fn draft(&self) -> &Card {
        &self.draft
    }

    /// Stores the form's current content as the draft.
    pub fn replace_draft(&mut self, card: Card) {
        self.draft = card;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_card_selected(&self) -> bool {
        self.selection.is_editing()
    }

    pub fn showing_back(&self) -> bool {
        self.show_back
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn flip(&mut self) {
        self.show_back = !self.show_back;
    }

    fn reset_draft(&mut self, game: &Game) {
        self.selection = Selection::Idle;
        self.draft = draft_card(game, self.deck_index, None);
    }

    /// Opens the deck at `index`. An unknown deck raises one alert and changes nothing.
    pub fn select_deck(
        &mut self,
        game: &Game,
        index: usize,
        ctx: &EditorContext<'_>,
    ) -> Result<(), EditorError> {
        if self.saving {
            let error = EditorError::SaveInProgress;
            ctx.alert_all([error.to_string()]);
            return Err(error);
        }
        if index >= game.decks.len() {
            let error = EditorError::InvalidDeck { index };
            log::warn!("{error} ({} decks)", game.decks.len());
            ctx.alert_all([error.to_string()]);
            return Err(error);
        }

        self.deck_index = Some(index);
        self.reset_draft(game);
        Ok(())
    }

    /// `None` starts a blank card; `Some(i)` edits the card at `i` in the open deck.
    pub fn select_card(&mut self, game: &Game, index: Option<usize>) -> Result<(), EditorError> {
        let Some(index) = index else {
            self.reset_draft(game);
            return Ok(());
        };

        let card = self.card_at(game, index)?;
        self.draft = card.clone();
        self.selection = Selection::Editing { index };
        Ok(())
    }

    pub fn edit(&mut self, game: &Game, index: usize) -> Result<(), EditorError> {
        self.select_card(game, Some(index))
    }

    /// Drafts a new card seeded from the card at `index`.
    pub fn create_from(&mut self, game: &Game, index: usize) -> Result<(), EditorError> {
        self.card_at(game, index)?;
        self.draft = draft_card(game, self.deck_index, Some(index));
        self.selection = Selection::Creating;
        Ok(())
    }

    /// Removes the card at `index` from the open deck. Nothing is sent to the API.
    pub fn delete_card(&mut self, game: &mut Game, index: usize) -> Result<Card, EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        self.card_at(game, index)?;
        let deck = self
            .deck_index
            .and_then(|deck_index| game.deck_mut(deck_index))
            .ok_or(EditorError::NothingSelected { kind: "deck" })?;
        let removed = deck.cards.remove(index);
        log::debug!("removed card {:?} from deck {:?}", removed.id, deck.id);
        self.reset_draft(game);
        Ok(removed)
    }

    fn card_at<'g>(&self, game: &'g Game, index: usize) -> Result<&'g Card, EditorError> {
        self.deck(game)
            .ok_or(EditorError::NothingSelected { kind: "deck" })?
            .cards
            .get(index)
            .ok_or(EditorError::IndexOutOfRange { kind: "card", index })
    }

    pub fn validate(&self, game: &Game) -> Result<Vec<ValidationIssue>, EditorError> {
        let deck = self
            .deck(game)
            .ok_or(EditorError::NothingSelected { kind: "deck" })?;
        Ok(validate_card(&self.draft, deck, &self.config))
    }

    pub fn prepare_save(
        &mut self,
        game: &Game,
        ctx: &EditorContext<'_>,
    ) -> Result<PendingCard, SaveError> {
        if self.saving {
            return Err(reject_busy(ctx));
        }

        let (deck_index, deck) = match self.deck_index.zip(self.deck(game)) {
            Some(open) => open,
            None => {
                let error = EditorError::NothingSelected { kind: "deck" };
                ctx.alert_all([error.to_string()]);
                return Err(error.into());
            }
        };

        let issues = validate_card(&self.draft, deck, &self.config);
        if !issues.is_empty() {
            return Err(reject_invalid(ctx, issues));
        }

        let target = SaveTarget::for_selection(self.selection);
        let mut draft = self.draft.clone();
        if target == SaveTarget::Create {
            draft.deck = deck.id.clone();
        }
        log::info!("saving card {:?} in deck {:?} ({target:?})", draft.card_front.title, deck.id);

        self.saving = true;
        ctx.app.set_global_loading(true);
        Ok(PendingCard {
            deck_index,
            draft,
            target,
        })
    }

    pub fn settle_save(
        &mut self,
        game: &mut Game,
        pending: PendingCard,
        result: Result<Card, ApiError>,
        ctx: &EditorContext<'_>,
    ) -> Result<Card, SaveError> {
        self.saving = false;
        let saved = result.map_err(|error| report_remote_failure(ctx, error))?;

        let target_id = pending.draft.id.clone();
        let is_target = |card: &Card| card.id.is_some() && card.id == target_id;
        match game.deck_mut(pending.deck_index) {
            Some(deck) => store_saved(&mut deck.cards, pending.target, saved.clone(), is_target),
            None => log::warn!("deck {} vanished while saving a card", pending.deck_index),
        }
        self.reset_draft(game);

        ctx.app.set_global_loading(false);
        ctx.app.set_app_alerts(vec![Alert::success("Saved")]);
        ctx.games.set_game(game.clone());
        Ok(saved)
    }

    pub async fn save<A>(
        &mut self,
        game: &mut Game,
        api: &A,
        ctx: &EditorContext<'_>,
    ) -> Result<Card, SaveError>
    where
        A: CardApi + ?Sized,
    {
        let pending = self.prepare_save(game, ctx)?;
        let result = pending.dispatch(api).await;
        self.settle_save(game, pending, result, ctx)
    }

    pub fn begin_pull(&self, ctx: &EditorContext<'_>) {
        ctx.app.set_global_loading(true);
    }

    /// Copies the pulled cards into the matching decks of `game`, by deck id.
    pub fn finish_pull(
        &mut self,
        game: &mut Game,
        pulled: Result<Game, ApiError>,
        ctx: &EditorContext<'_>,
    ) -> Result<(), ApiError> {
        ctx.app.set_global_loading(false);
        let pulled = match pulled {
            Ok(pulled) => pulled,
            Err(error) => {
                log::warn!("pulling cards failed: {error}");
                ctx.alert_all(error.messages());
                return Err(error);
            }
        };

        for deck in &mut game.decks {
            if let Some(source) = pulled.decks.iter().find(|source| source.id == deck.id) {
                deck.cards = source.cards.clone();
            }
        }
        if !self.selection.is_editing() {
            self.reset_draft(game);
        }
        ctx.games.set_game(game.clone());
        Ok(())
    }

    /// Fetches the cards of every deck.
    pub async fn init_cards<A>(
        &mut self,
        game: &mut Game,
        api: &A,
        ctx: &EditorContext<'_>,
    ) -> Result<(), ApiError>
    where
        A: CardApi + ?Sized,
    {
        self.begin_pull(ctx);
        let mut snapshot = game.clone();
        let pulled = api.pull_cards(&mut snapshot).await.map(|()| snapshot);
        self.finish_pull(game, pulled, ctx)
    }
}
