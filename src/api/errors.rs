use serde_json::Value;
use thiserror::Error;

const FALLBACK_MESSAGE: &str = "Unexpected error";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, payload: Value },
    #[error("network error: {0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("cannot update a {0} without an id")]
    MissingId(&'static str),
}

impl ApiError {
    pub fn rejected(status: u16, payload: Value) -> Self {
        ApiError::Rejected { status, payload }
    }

    /// Human-readable messages for the alert bar.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Rejected { payload, .. } => get_errors(payload),
            other => vec![other.to_string()],
        }
    }
}

/// Normalizes an arbitrary error payload into display strings.
///
/// Strings pass through, arrays are flattened, objects contribute their
/// `errors`, `message` or `error` entry (in that order of preference) or, failing
/// those, all of their values.
pub fn get_errors(payload: &Value) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages(payload, &mut messages);
    if messages.is_empty() {
        messages.push(FALLBACK_MESSAGE.to_string());
    }
    messages
}

fn collect_messages(payload: &Value, out: &mut Vec<String>) {
    match payload {
        Value::String(message) if !message.is_empty() => out.push(message.clone()),
        Value::Array(items) => {
            for item in items {
                collect_messages(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(inner) = ["errors", "message", "error"]
                .iter()
                .find_map(|key| map.get(*key))
            {
                collect_messages(inner, out);
            } else {
                for value in map.values() {
                    collect_messages(value, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_of_strings_passes_through() {
        assert_eq!(get_errors(&json!(["bad request"])), vec!["bad request"]);
    }

    #[test]
    fn nested_payloads_are_flattened() {
        let payload = json!({
            "errors": [
                {"message": "label is required"},
                {"field": "x", "message": "x must be a number"}
            ]
        });
        assert_eq!(
            get_errors(&payload),
            vec!["label is required", "x must be a number"]
        );
    }

    #[test]
    fn validation_maps_fall_back_to_values() {
        let payload = json!({"label": "too long", "color": ["invalid color"]});
        let mut messages = get_errors(&payload);
        messages.sort();
        assert_eq!(messages, vec!["invalid color", "too long"]);
    }

    #[test]
    fn unusable_payload_gets_fallback() {
        assert_eq!(get_errors(&Value::Null), vec![FALLBACK_MESSAGE]);
        assert_eq!(get_errors(&json!({"status": 500})), vec![FALLBACK_MESSAGE]);
    }

    #[test]
    fn transport_errors_use_display() {
        let error = ApiError::Transport("offline".into());
        assert_eq!(error.messages(), vec!["network error: offline"]);
    }
}
