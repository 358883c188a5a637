//! Client-side checks run before anything is sent to the API.
//!
//! Validation never stops at the first problem: every issue found is returned so
//! the UI can show them all at once.

use serde::Serialize;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::model::{BackField, Card, Deck, FrontField, State};

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ValidationIssue {
    #[error("Card repetitions must be up to {max}")]
    TooManyRepetitions { max: i32 },
    #[error("Card repetitions must be greater than {floor}")]
    TooFewRepetitions { floor: i32 },
    #[error("Front's {field} is invalid")]
    InvalidFrontField { field: &'static str },
    #[error("Back's {field} is invalid")]
    InvalidBackField { field: &'static str },
    #[error("No data to save")]
    NothingToSave,
    #[error("Please, create a transition or a conditional rule to this state")]
    MissingExit,
    #[error("You can't create or edit neither states 'Game Start' or 'Game Over'")]
    ProtectedState { label: String },
}

pub fn messages(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}

pub fn validate_card(card: &Card, deck: &Deck, config: &EditorConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if card.repetitions > config.max_repetitions {
        issues.push(ValidationIssue::TooManyRepetitions {
            max: config.max_repetitions,
        });
    }
    if card.repetitions < config.min_repetitions {
        issues.push(ValidationIssue::TooFewRepetitions {
            floor: config.min_repetitions - 1,
        });
    }

    // Art is optional artwork and never enforced.
    for field in FrontField::ALL {
        if field == FrontField::Art || !deck.deck_front.requires(field) {
            continue;
        }
        if card.card_front.field(field).is_blank() {
            issues.push(ValidationIssue::InvalidFrontField {
                field: field.name(),
            });
        }
    }

    for field in BackField::ALL {
        if deck.deck_back.requires(field) && card.card_back.field(field).is_blank() {
            issues.push(ValidationIssue::InvalidBackField {
                field: field.name(),
            });
        }
    }

    issues
}

pub fn validate_state(state: Option<&State>, config: &EditorConfig) -> Vec<ValidationIssue> {
    let Some(state) = state else {
        return vec![ValidationIssue::NothingToSave];
    };

    let mut issues = Vec::new();
    if !state.has_exit() {
        issues.push(ValidationIssue::MissingExit);
    }
    if config.is_protected_label(&state.label) {
        issues.push(ValidationIssue::ProtectedState {
            label: state.label.clone(),
        });
    }
    issues
}
