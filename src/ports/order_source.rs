//! Subscription order port.

use async_trait::async_trait;
use serde_json::Value;

/// Fetches subscription orders that renewal events reference by id only.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn get_order(&self, order_id: &str) -> Result<Value, OrderError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OrderError {
    #[error("order service not configured")]
    Unavailable,

    #[error("order not found: {0}")]
    NotFound(String),

    #[error("order request failed: {0}")]
    Network(String),

    #[error("order service returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unreadable order response: {0}")]
    Parse(String),
}
