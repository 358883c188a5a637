use std::cell::RefCell;
use std::fmt;

use super::{GameListener, GameService};
use crate::model::Game;

/// In-memory holder of the current game that notifies subscribers on every
/// `set_game`.
#[derive(Default)]
pub struct GameStore {
    game: RefCell<Option<Game>>,
    listeners: RefCell<Vec<GameListener>>,
}

impl fmt::Debug for GameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStore")
            .field("game", &self.game.borrow().as_ref().map(|game| &game.id))
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game(game: Game) -> Self {
        let store = Self::new();
        store.game.replace(Some(game));
        store
    }
}

impl GameService for GameStore {
    fn game(&self) -> Option<Game> {
        self.game.borrow().clone()
    }

    fn set_game(&self, game: Game) {
        log::debug!("publishing game {:?}", game.id);
        self.game.replace(Some(game.clone()));
        for listener in self.listeners.borrow().iter() {
            listener(&game);
        }
    }

    /// Listeners must not subscribe further listeners while being notified.
    fn subscribe(&self, listener: GameListener) {
        if let Some(game) = self.game.borrow().as_ref() {
            listener(game);
        }
        self.listeners.borrow_mut().push(listener);
    }
}
