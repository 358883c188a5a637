//! Game data model: decks, cards, the state graph and its rules.

pub mod draft;
pub mod game;
pub mod rules;
pub mod state;

/// Server-assigned identity; `None` until the entity is first saved.
pub type EntityId = Option<String>;

pub use draft::{draft_card, draft_state};
pub use game::{
    BackField, BackSchema, Card, CardBack, CardFront, Deck, FieldValue, FrontField, FrontSchema,
    Game,
};
pub use rules::{Comparator, ConditionalRule, EffectRule, Operation, StatementRule, Transition};
pub use state::State;
