//! Directory service port - contact lookup by email or id.
//!
//! Records are returned raw; the domain layer decides which fields of a
//! contact carry the name and email (see `ContactDetails::from_record`).

use async_trait::async_trait;
use serde_json::Value;

/// Port for the contacts directory.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Find contacts whose email matches exactly.
    async fn query_by_email(&self, email: &str) -> Result<Vec<Value>, DirectoryError>;

    /// Fetch a single contact record by id.
    async fn get_by_id(&self, contact_id: &str) -> Result<Value, DirectoryError>;
}

/// Errors from directory lookups. Always recovered by the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory not configured")]
    Unavailable,

    #[error("contact not found: {0}")]
    NotFound(String),

    #[error("directory request failed: {0}")]
    Network(String),

    #[error("directory returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unreadable directory response: {0}")]
    Parse(String),
}
