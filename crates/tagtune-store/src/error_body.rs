//! Mapping of non-success store responses to [`Error`].
//!
//! The host reports failures as JSON. The message is taken from the first
//! shape that matches:
//!
//! - `{"detail": "message"}`
//! - `{"detail": {"code": "PLUGIN_INACTIVE", ...}}` (becomes [`Error::PluginInactive`])
//! - `{"detail": {"message": "..."}}`
//! - `{"detail": [{"msg": "..."}, ...]}` (request validation errors)
//! - `{"error": "message"}` or `{"message": "message"}`
//!
//! Anything else falls back to a status-based message.

use serde_json::Value as JsonValue;
use tagtune_core::Error;

/// Structured code the host uses when the plugin failed to activate.
pub const PLUGIN_INACTIVE_CODE: &str = "PLUGIN_INACTIVE";

/// Build the error for a non-success response.
pub fn error_from_response(status: u16, body: &str) -> Error {
    let parsed: Option<JsonValue> = serde_json::from_str(body).ok();

    if let Some(detail) = parsed.as_ref().and_then(|v| v.get("detail")) {
        if detail.get("code").and_then(JsonValue::as_str) == Some(PLUGIN_INACTIVE_CODE) {
            let text = |key: &str, fallback: &str| {
                detail
                    .get(key)
                    .and_then(JsonValue::as_str)
                    .unwrap_or(fallback)
                    .to_string()
            };
            return Error::PluginInactive {
                plugin: text("plugin", "unknown"),
                status: text("status", "missing"),
                message: text("message", "Plugin did not activate successfully."),
            };
        }
    }

    let message = parsed
        .as_ref()
        .and_then(structured_message)
        .unwrap_or_else(|| status_message(status));
    Error::Request(message)
}

/// Generic message when the body carries nothing usable.
pub fn status_message(status: u16) -> String {
    format!("Request failed with status {}", status)
}

fn structured_message(body: &JsonValue) -> Option<String> {
    if let Some(detail) = body.get("detail") {
        match detail {
            JsonValue::String(s) if !s.is_empty() => return Some(s.clone()),
            JsonValue::Object(_) => {
                if let Some(msg) = detail.get("message").and_then(JsonValue::as_str) {
                    return Some(msg.to_string());
                }
            }
            JsonValue::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(JsonValue::as_str))
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            _ => {}
        }
    }

    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(JsonValue::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
