//! Contracts of the collaborators the editor talks to: the remote API, the
//! current-game holder and the app shell (loading spinner and alerts).

pub mod errors;
pub mod fetch;
pub mod status;
pub mod store;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Card, Game, State};

pub use errors::{get_errors, ApiError};
pub use fetch::FetchClient;
pub use status::AppStatus;
pub use store::GameStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Danger,
}

/// Toast-style notification shown by the app shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: AlertKind::Success,
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: AlertKind::Danger,
        }
    }

    pub fn dangers<I>(messages: I) -> Vec<Alert>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        messages.into_iter().map(Alert::danger).collect()
    }
}

pub trait AppService {
    fn set_global_loading(&self, loading: bool);
    fn set_app_alerts(&self, alerts: Vec<Alert>);
}

pub type GameListener = Box<dyn Fn(&Game)>;

/// Holder of the game currently open in the editor.
pub trait GameService {
    fn game(&self) -> Option<Game>;
    fn set_game(&self, game: Game);
    fn subscribe(&self, listener: GameListener);
}

#[async_trait(?Send)]
pub trait CardApi {
    /// Fills every deck of `game` with its cards.
    async fn pull_cards(&self, game: &mut Game) -> Result<(), ApiError>;
    async fn create_card(&self, card: &Card) -> Result<Card, ApiError>;
    async fn update_card(&self, card: &Card) -> Result<Card, ApiError>;
}

#[async_trait(?Send)]
pub trait StateApi {
    async fn create_state(&self, state: &State) -> Result<State, ApiError>;
    async fn update_state(&self, state: &State) -> Result<State, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_wire_format() {
        let json = serde_json::to_string(&Alert::danger("bad request")).expect("alert should serialize");
        assert_eq!(json, r#"{"message":"bad request","type":"danger"}"#);
    }
}
