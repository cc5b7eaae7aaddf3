//! Secret store backed by process environment variables.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::ports::{SecretError, SecretStore};

/// Reads secrets from environment variables named after the secret.
///
/// An optional prefix is prepended, so with prefix `PAYMENT_ALERTS_` the
/// secret `TELEGRAM_BOT_TOKEN` is read from `PAYMENT_ALERTS_TELEGRAM_BOT_TOKEN`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn variable(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get(&self, name: &str) -> Result<SecretString, SecretError> {
        match std::env::var(self.variable(name)) {
            Ok(value) if !value.is_empty() => Ok(SecretString::new(value)),
            Ok(_) | Err(std::env::VarError::NotPresent) => {
                Err(SecretError::Missing(name.to_string()))
            }
            Err(e) => Err(SecretError::Unavailable(e.to_string())),
        }
    }
}
