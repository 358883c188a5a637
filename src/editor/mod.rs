//! Editing sessions for the state graph and for decks and cards.
//!
//! Both editors keep only session data (the draft, what is selected, which forms
//! are open). The `Game` itself is passed in by the caller, who owns it.
//!
//! Saving is split in three steps so that no borrow is held across the network
//! call: `prepare_save` validates and raises the loading flag, the caller
//! dispatches the request, and `settle_save` folds the answer back into the game.
//! `save` chains the three for callers that can hold `&mut` across an await.

pub mod card_editor;
pub mod selection;
pub mod state_editor;

use serde::Serialize;
use thiserror::Error;

use crate::api::{Alert, ApiError, AppService, GameService};
use crate::validation::{messages, ValidationIssue};

pub use card_editor::{CardEditor, PendingCard};
pub use selection::{FormVisibility, RuleForm, Selection};
pub use state_editor::{PendingState, StateEditor};

/// The app-shell services an editor reports to.
#[derive(Clone, Copy)]
pub struct EditorContext<'a> {
    pub app: &'a dyn AppService,
    pub games: &'a dyn GameService,
}

impl<'a> EditorContext<'a> {
    pub fn new(app: &'a dyn AppService, games: &'a dyn GameService) -> Self {
        Self { app, games }
    }

    fn alert_all<I>(&self, messages: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.app.set_app_alerts(Alert::dangers(messages));
    }
}

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EditorError {
    #[error("Invalid {kind} index. Please, reload the page")]
    IndexOutOfRange { kind: &'static str, index: usize },
    /// Deck selection keeps the alert text the host page has always shown.
    #[error("Invalid card index. Please, reload the page")]
    InvalidDeck { index: usize },
    #[error("No {kind} selected")]
    NothingSelected { kind: &'static str },
    #[error("A save is already in progress")]
    SaveInProgress,
    #[error("Confirm or cancel the pending delete first")]
    DeletePending,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SaveError {
    #[error("{} validation issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
    #[error("A save is already in progress")]
    Busy,
    #[error(transparent)]
    Selection(#[from] EditorError),
    #[error(transparent)]
    Remote(#[from] ApiError),
}

impl SaveError {
    pub fn messages(&self) -> Vec<String> {
        match self {
            SaveError::Invalid(issues) => messages(issues),
            SaveError::Remote(error) => error.messages(),
            other => vec![other.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SaveTarget {
    Create,
    Update { index: usize },
}

impl SaveTarget {
    fn for_selection(selection: Selection) -> Self {
        match selection.editing_index() {
            Some(index) => SaveTarget::Update { index },
            None => SaveTarget::Create,
        }
    }
}

/// Surfaces a remote failure. The game and the draft stay as they were.
fn report_remote_failure(ctx: &EditorContext<'_>, error: ApiError) -> SaveError {
    log::warn!("save failed: {error}");
    ctx.app.set_global_loading(false);
    ctx.alert_all(error.messages());
    SaveError::Remote(error)
}

fn reject_invalid(ctx: &EditorContext<'_>, issues: Vec<ValidationIssue>) -> SaveError {
    log::debug!("save blocked by {} validation issue(s)", issues.len());
    ctx.alert_all(messages(&issues));
    SaveError::Invalid(issues)
}

fn reject_busy(ctx: &EditorContext<'_>) -> SaveError {
    let error = SaveError::Busy;
    ctx.alert_all([error.to_string()]);
    error
}

/// Replaces the entry at `target` with the server copy, or appends it.
///
/// An update only lands on an entry `is_target` accepts. If the list moved
/// while the request was out, the entry is looked up again.
fn store_saved<T, F>(items: &mut Vec<T>, target: SaveTarget, saved: T, is_target: F)
where
    F: Fn(&T) -> bool,
{
    let SaveTarget::Update { index } = target else {
        items.push(saved);
        return;
    };

    let slot = if items.get(index).is_some_and(&is_target) {
        Some(index)
    } else {
        items.iter().position(&is_target)
    };
    match slot {
        Some(slot) => {
            if slot != index {
                log::warn!("entry {index} moved to {slot} while saving");
            }
            items[slot] = saved;
        }
        None => {
            log::warn!("entry {index} vanished while saving; appending the saved copy");
            items.push(saved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remote_errors_expand_to_payload_messages() {
        let error = SaveError::from(ApiError::rejected(400, json!(["bad request", "try again"])));
        assert_eq!(error.messages(), vec!["bad request", "try again"]);
    }

    #[test]
    fn selection_errors_render_their_alert() {
        let error = SaveError::from(EditorError::InvalidDeck { index: 4 });
        assert_eq!(
            error.messages(),
            vec!["Invalid card index. Please, reload the page"]
        );
    }

    #[test]
    fn stored_copies_replace_in_place() {
        let mut items = vec![(1, "a"), (2, "b"), (3, "c")];
        store_saved(&mut items, SaveTarget::Update { index: 1 }, (2, "B"), |item| item.0 == 2);
        store_saved(&mut items, SaveTarget::Create, (4, "d"), |_| false);
        store_saved(&mut items, SaveTarget::Update { index: 9 }, (5, "e"), |item| item.0 == 5);
        assert_eq!(items, vec![(1, "a"), (2, "B"), (3, "c"), (4, "d"), (5, "e")]);
    }

    #[test]
    fn stale_index_follows_the_entry() {
        let mut items = vec![(2, "b"), (3, "c")];
        store_saved(&mut items, SaveTarget::Update { index: 1 }, (2, "B"), |item| item.0 == 2);
        assert_eq!(items, vec![(2, "B"), (3, "c")]);
    }
}
