//! Scripted API doubles for driving the editors without a server.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, CardApi, StateApi};
use crate::model::{Card, EntityId, Game, State};

#[derive(Debug, Clone)]
enum Reply {
    /// Answer with the request body, stamped with this id.
    Accept(String),
    Reject(Value),
    Echo,
}

impl Reply {
    fn answer<T: Clone>(&self, body: &T, stamp: impl FnOnce(&mut T, String)) -> Result<T, ApiError> {
        match self {
            Reply::Accept(id) => {
                let mut saved = body.clone();
                stamp(&mut saved, id.clone());
                Ok(saved)
            }
            Reply::Reject(payload) => Err(ApiError::rejected(400, payload.clone())),
            Reply::Echo => Ok(body.clone()),
        }
    }
}

#[derive(Debug)]
pub struct ScriptedStateApi {
    reply: Reply,
    creates: Cell<usize>,
    updates: Cell<usize>,
}

impl ScriptedStateApi {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            creates: Cell::new(0),
            updates: Cell::new(0),
        }
    }

    pub fn accepting(id: &str) -> Self {
        Self::with_reply(Reply::Accept(id.to_string()))
    }

    pub fn rejecting(payload: Value) -> Self {
        Self::with_reply(Reply::Reject(payload))
    }

    pub fn echoing() -> Self {
        Self::with_reply(Reply::Echo)
    }

    pub fn creates(&self) -> usize {
        self.creates.get()
    }

    pub fn updates(&self) -> usize {
        self.updates.get()
    }
}

#[async_trait(?Send)]
impl StateApi for ScriptedStateApi {
    async fn create_state(&self, state: &State) -> Result<State, ApiError> {
        self.creates.set(self.creates.get() + 1);
        self.reply.answer(state, |saved, id| saved.id = Some(id))
    }

    async fn update_state(&self, state: &State) -> Result<State, ApiError> {
        self.updates.set(self.updates.get() + 1);
        self.reply.answer(state, |saved, id| saved.id = Some(id))
    }
}

#[derive(Debug)]
pub struct ScriptedCardApi {
    reply: Reply,
    library: Game,
    calls: Cell<usize>,
    created_decks: RefCell<Vec<EntityId>>,
}

impl ScriptedCardApi {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            library: Game::default(),
            calls: Cell::new(0),
            created_decks: RefCell::new(Vec::new()),
        }
    }

    pub fn accepting(id: &str) -> Self {
        Self::with_reply(Reply::Accept(id.to_string()))
    }

    pub fn rejecting(payload: Value) -> Self {
        Self::with_reply(Reply::Reject(payload))
    }

    pub fn echoing() -> Self {
        Self::with_reply(Reply::Echo)
    }

    /// Serves the cards of `library` on pull, matched to decks by id.
    pub fn with_library(library: Game) -> Self {
        Self {
            library,
            ..Self::echoing()
        }
    }

    /// Create and update calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn created_decks(&self) -> Vec<EntityId> {
        self.created_decks.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CardApi for ScriptedCardApi {
    async fn pull_cards(&self, game: &mut Game) -> Result<(), ApiError> {
        if let Reply::Reject(payload) = &self.reply {
            return Err(ApiError::rejected(500, payload.clone()));
        }
        for deck in &mut game.decks {
            if let Some(source) = self.library.decks.iter().find(|source| source.id == deck.id) {
                deck.cards = source.cards.clone();
            }
        }
        Ok(())
    }

    async fn create_card(&self, card: &Card) -> Result<Card, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.created_decks.borrow_mut().push(card.deck.clone());
        self.reply.answer(card, |saved, id| saved.id = Some(id))
    }

    async fn update_card(&self, card: &Card) -> Result<Card, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.reply.answer(card, |saved, id| saved.id = Some(id))
    }
}
