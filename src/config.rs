//! Editor configuration, supplied by the host page as JSON.

use serde::{Deserialize, Serialize};

const DEFAULT_MIN_REPETITIONS: i32 = 1;
const DEFAULT_MAX_REPETITIONS: i32 = 30;

/// Geometry and color given to freshly drafted states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DraftDefaults {
    pub color: String,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            color: "#dedede".into(),
            width: 160.0,
            height: 80.0,
            x: 30.0,
            y: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub api_base_url: String,
    pub min_repetitions: i32,
    pub max_repetitions: i32,
    /// Terminal states that can never be created or edited.
    pub protected_labels: Vec<String>,
    pub draft: DraftDefaults,
    /// `log` level name (`"debug"`, `"warn"`, ...); `Info` when absent or unknown.
    pub log_level: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".into(),
            min_repetitions: DEFAULT_MIN_REPETITIONS,
            max_repetitions: DEFAULT_MAX_REPETITIONS,
            protected_labels: vec!["Game Start".into(), "Game Over".into()],
            draft: DraftDefaults::default(),
            log_level: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_repetition_range(mut self, min: i32, max: i32) -> Self {
        self.min_repetitions = min;
        self.max_repetitions = max;
        self
    }

    pub fn log_level(&self) -> log::LevelFilter {
        crate::utils::parse_level(self.log_level.as_deref())
    }

    pub fn is_protected_label(&self, label: &str) -> bool {
        self.protected_labels.iter().any(|protected| protected == label)
    }
}
