//! Outbound messaging port.
//!
//! Delivery is fire-and-forget from the caller's point of view: a failed
//! send is reported once and never retried.

use async_trait::async_trait;

use super::secret_store::SecretError;

/// Delivers one rendered HTML message to the alert channel.
#[async_trait]
pub trait AlertSender: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeliveryError {
    /// The messaging API answered with a non-2xx status.
    #[error("messaging API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("messaging API unreachable: {0}")]
    Transport(String),

    #[error(transparent)]
    Secret(#[from] SecretError),
}

impl DeliveryError {
    pub fn status(&self) -> Option<u16> {
        match self {
            DeliveryError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
