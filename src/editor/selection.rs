use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the editing form is currently bound to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    /// Nothing picked; the draft is blank.
    #[default]
    Idle,
    /// A new entity is being drafted.
    Creating,
    /// The entity at `index` of the owning collection is being edited.
    Editing { index: usize },
}

impl Selection {
    pub fn editing_index(&self) -> Option<usize> {
        match self {
            Selection::Editing { index } => Some(*index),
            Selection::Idle | Selection::Creating => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Selection::Editing { .. })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleForm {
    Statement,
    Conditional,
    Transition,
    Effect,
}

impl FromStr for RuleForm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "statement" => Ok(RuleForm::Statement),
            "conditional" => Ok(RuleForm::Conditional),
            "transition" => Ok(RuleForm::Transition),
            "effect" => Ok(RuleForm::Effect),
            _ => Err(()),
        }
    }
}

/// Which panels and popups are open. At most one rule form is visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormVisibility {
    pub rule_form: Option<RuleForm>,
    pub details: bool,
    pub state_form: bool,
    pub delete_popup: bool,
}

impl FormVisibility {
    /// Opening a rule form closes whichever one was open.
    pub fn show_rule(&mut self, form: RuleForm) {
        self.rule_form = Some(form);
    }

    pub fn is_showing(&self, form: RuleForm) -> bool {
        self.rule_form == Some(form)
    }

    pub fn hide_all_rules(&mut self) {
        self.rule_form = None;
    }

    pub fn hide_all(&mut self) {
        *self = Self::default();
    }
}
