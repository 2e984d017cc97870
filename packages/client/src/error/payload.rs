//! Decoded body of an error response
//!
//! CouchDB reports failures as `{"error": "...", "reason": "..."}`. Anything
//! that does not decode as such a JSON object is kept as raw text so the
//! status-derived error is never masked by a decode failure.

use std::fmt;

use serde_json::Value;

/// Best-effort decoded error body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorPayload {
    /// `(error, reason)` pair from a JSON object body
    Json {
        error: Option<String>,
        reason: Option<String>,
    },
    /// Body that was not a JSON object
    Text(String),
    /// No body (HEAD, empty response)
    #[default]
    Empty,
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl ErrorPayload {
    /// Decode an error body, degrading to raw text
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return ErrorPayload::Empty;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(mut members)) => ErrorPayload::Json {
                error: members.remove("error").filter(|v| !v.is_null()).map(value_to_string),
                reason: members.remove("reason").filter(|v| !v.is_null()).map(value_to_string),
            },
            _ => ErrorPayload::Text(String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// The `error` member of a JSON payload
    pub fn error(&self) -> Option<&str> {
        match self {
            ErrorPayload::Json { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// The `reason` member of a JSON payload
    pub fn reason(&self) -> Option<&str> {
        match self {
            ErrorPayload::Json { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPayload::Json { error, reason } => write!(
                f,
                "({}, {})",
                error.as_deref().unwrap_or("-"),
                reason.as_deref().unwrap_or("-")
            ),
            ErrorPayload::Text(text) => f.write_str(text),
            ErrorPayload::Empty => f.write_str("<empty>"),
        }
    }
}
