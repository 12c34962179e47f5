//! Structured-output constraint for closed-label answers.
//!
//! Providers that support JSON-schema decoding receive a schema whose single
//! `answer` field is an enum over the allowed labels, so the model cannot
//! produce anything else. The reply is unwrapped back to the bare label.

use serde_json::{json, Value};

/// Name of the field carrying the chosen label.
pub const ANSWER_FIELD: &str = "answer";

/// JSON schema for an object whose `answer` is one of `labels`.
pub fn answer_schema(labels: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": {
            ANSWER_FIELD: { "type": "string", "enum": labels }
        },
        "required": [ANSWER_FIELD],
        "additionalProperties": false
    })
}

/// Pulls the label out of a structured reply.
///
/// Replies that are not the expected object come back unchanged, leaving the
/// label check to reject them.
pub fn extract_answer(content: &str) -> String {
    serde_json::from_str::<Value>(content.trim())
        .ok()
        .and_then(|value| {
            value
                .get(ANSWER_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| content.to_string())
}
