//! Normalizer-level errors.
//!
//! These never leave a handler: the boundary in `handlers` logs them and
//! turns them into a failed disposition.

use crate::domain::PaymentEventKind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AlertError {
    /// The event payload is not a JSON object.
    #[error("malformed {kind} event: expected an object, got {found}")]
    MalformedEvent {
        kind: PaymentEventKind,
        found: &'static str,
    },

    /// A normalizer panicked while processing the event.
    #[error("{kind} handler panicked: {message}")]
    Panicked {
        kind: PaymentEventKind,
        message: String,
    },
}

impl AlertError {
    pub fn malformed(kind: PaymentEventKind, value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        AlertError::MalformedEvent { kind, found }
    }
}
