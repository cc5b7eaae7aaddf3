//! Secret store port.

use async_trait::async_trait;
use secrecy::SecretString;

/// Named secret lookup (bot token, chat id).
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<SecretString, SecretError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    Missing(String),

    #[error("secret store unavailable: {0}")]
    Unavailable(String),
}
