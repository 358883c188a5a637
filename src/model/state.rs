use serde::{Deserialize, Serialize};

use super::rules::{ConditionalRule, StatementRule, Transition};
use super::EntityId;

/// A node of the game-logic graph, placed on the editor canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(rename = "_id", default)]
    pub id: EntityId,
    #[serde(default)]
    pub game: EntityId,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub conditional_rule: Option<ConditionalRule>,
    #[serde(default)]
    pub statement_rules: Vec<StatementRule>,
    #[serde(default)]
    pub transition: Option<Transition>,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl State {
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// At least one outgoing edge, either a transition or a conditional rule.
    pub fn has_exit(&self) -> bool {
        self.transition.is_some() || self.conditional_rule.is_some()
    }

    pub fn set_conditional_rule(&mut self, rule: ConditionalRule) {
        self.transition = None;
        self.conditional_rule = Some(rule);
    }

    pub fn set_transition(&mut self, transition: Transition) {
        self.conditional_rule = None;
        self.transition = Some(transition);
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.set_transition(transition);
        self
    }

    pub fn with_conditional_rule(mut self, rule: ConditionalRule) -> Self {
        self.set_conditional_rule(rule);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rules::Comparator;
    use crate::model::Game;

    #[test]
    fn conditional_rule_and_transition_are_exclusive() {
        let game = Game::sample();
        let mut state = game.states[1].clone();
        assert!(state.transition.is_some());

        state.set_conditional_rule(ConditionalRule::new("score", Comparator::Gt, "10"));
        assert!(state.transition.is_none());
        assert!(state.conditional_rule.is_some());

        state.set_transition(Transition::new("next"));
        assert!(state.conditional_rule.is_none());
        assert!(state.has_exit());
    }

    #[test]
    fn state_reads_wire_format() {
        let json = r##"{
            "_id": "s1",
            "game": "g1",
            "color": "#dedede",
            "label": "Draw",
            "purpose": "draw a card",
            "statementRules": [{"variable": "hand", "operation": "add", "value": "1"}],
            "transition": {"label": "next", "target": "s2"},
            "width": 160, "height": 80, "x": 30, "y": 30
        }"##;

        let state: State = serde_json::from_str(json).expect("state should parse");
        assert_eq!(state.id.as_deref(), Some("s1"));
        assert!(state.conditional_rule.is_none());
        assert_eq!(state.statement_rules.len(), 1);
        assert_eq!(
            state.transition.and_then(|transition| transition.target).as_deref(),
            Some("s2")
        );
    }
}
