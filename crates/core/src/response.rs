//! Interpretation of model API responses
//!
//! Both summarizer backends reduce whatever came back to a
//! [`ResponseEnvelope`]. A body that is not JSON is not an error: it is
//! surfaced as [`ResponseEnvelope::Raw`] so the user can inspect it.

use serde::Serialize;
use serde_json::Value;

/// The logical result of a single model call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResponseEnvelope {
    /// The model answered with text.
    Answer { text: String },
    /// The API returned a structured error payload.
    ApiError { error: Value },
    /// The body could not be parsed as JSON.
    Raw { status: u16, body: String },
    /// Well-formed JSON with neither an answer nor an error.
    Unrecognized { payload: Value },
}

impl ResponseEnvelope {
    pub fn answer(text: impl Into<String>) -> Self {
        ResponseEnvelope::Answer { text: text.into() }
    }
}

/// Classify a raw HTTP response body.
///
/// Recognizes the Messages API shape (`content[].text`), the legacy
/// completion shape (`completion`) and error payloads (`error`).
pub fn interpret_body(status: u16, body: &str) -> ResponseEnvelope {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return ResponseEnvelope::Raw {
                status,
                body: body.to_string(),
            }
        }
    };

    interpret_value(value)
}

/// Classify an already-parsed JSON response.
pub fn interpret_value(value: Value) -> ResponseEnvelope {
    if let Some(text) = extract_text(&value) {
        return ResponseEnvelope::Answer { text };
    }

    match value.get("error") {
        Some(error) if !error.is_null() => ResponseEnvelope::ApiError {
            error: error.clone(),
        },
        _ => ResponseEnvelope::Unrecognized { payload: value },
    }
}

fn extract_text(value: &Value) -> Option<String> {
    if let Some(blocks) = value.get("content").and_then(Value::as_array) {
        let texts: Vec<&str> = blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect();

        if !texts.is_empty() {
            return Some(texts.join("\n"));
        }
    }

    value
        .get("completion")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// One-line description of an API error payload for console output.
pub fn describe_api_error(error: &Value) -> String {
    let kind = error.get("type").and_then(Value::as_str);
    let message = error.get("message").and_then(Value::as_str);

    match (kind, message) {
        (Some(kind), Some(message)) => format!("{kind}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_answer() {
        let body = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": "A static site with one page." }],
            "stop_reason": "end_turn"
        }"#;

        assert_eq!(
            interpret_body(200, body),
            ResponseEnvelope::answer("A static site with one page.")
        );
    }

    #[test]
    fn test_multiple_text_blocks_are_joined() {
        let value = json!({
            "content": [
                { "type": "text", "text": "first" },
                { "type": "tool_use", "id": "t", "name": "x", "input": {} },
                { "type": "text", "text": "second" }
            ]
        });

        assert_eq!(interpret_value(value), ResponseEnvelope::answer("first\nsecond"));
    }

    #[test]
    fn test_legacy_completion_answer() {
        let body = r#"{ "completion": " Hello there", "stop_reason": "stop_sequence" }"#;
        assert_eq!(interpret_body(200, body), ResponseEnvelope::answer(" Hello there"));
    }

    #[test]
    fn test_api_error() {
        let body = r#"{
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        }"#;

        match interpret_body(401, body) {
            ResponseEnvelope::ApiError { error } => {
                assert_eq!(
                    describe_api_error(&error),
                    "authentication_error: invalid x-api-key"
                );
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_is_raw() {
        let envelope = interpret_body(502, "<html>Bad Gateway</html>");

        assert_eq!(
            envelope,
            ResponseEnvelope::Raw {
                status: 502,
                body: "<html>Bad Gateway</html>".to_string()
            }
        );
    }

    #[test]
    fn test_unrecognized_json() {
        let envelope = interpret_body(200, r#"{ "content": [] }"#);
        assert_eq!(
            envelope,
            ResponseEnvelope::Unrecognized {
                payload: json!({ "content": [] })
            }
        );

        let envelope = interpret_body(200, r#"{ "error": null }"#);
        assert!(matches!(envelope, ResponseEnvelope::Unrecognized { .. }));
    }

    #[test]
    fn test_describe_api_error_fallbacks() {
        assert_eq!(describe_api_error(&json!({ "message": "boom" })), "boom");
        assert_eq!(describe_api_error(&json!("overloaded")), "\"overloaded\"");
    }
}
