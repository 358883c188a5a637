use serde::{Deserialize, Serialize};

use super::EntityId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Set,
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    #[default]
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A statement executed while the game sits in a state, e.g. `score add 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatementRule {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub variable: String,
    #[serde(default)]
    pub operation: Operation,
    #[serde(default)]
    pub value: String,
}

impl StatementRule {
    pub fn new(variable: impl Into<String>, operation: Operation, value: impl Into<String>) -> Self {
        Self {
            id: None,
            variable: variable.into(),
            operation,
            value: value.into(),
        }
    }
}

/// Branches to one of two states depending on a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub variable: String,
    #[serde(default)]
    pub comparator: Comparator,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_true: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_false: Option<String>,
}

impl ConditionalRule {
    pub fn new(variable: impl Into<String>, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            id: None,
            variable: variable.into(),
            comparator,
            value: value.into(),
            on_true: None,
            on_false: None,
        }
    }

    pub fn with_branches(mut self, on_true: impl Into<String>, on_false: impl Into<String>) -> Self {
        self.on_true = Some(on_true.into());
        self.on_false = Some(on_false.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EffectRule {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub target: String,
}

impl EffectRule {
    pub fn new(effect: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            effect: effect.into(),
            target: target.into(),
        }
    }
}

/// Unconditional edge to the next state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Transition {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}
