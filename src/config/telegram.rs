//! Telegram messaging configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::validate_http_url;

/// Telegram Bot API configuration.
///
/// The token and chat id themselves live in the secret store; these fields
/// only name the secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Secret holding the bot token
    #[serde(default = "default_bot_token_secret")]
    pub bot_token_secret: String,

    /// Secret holding the destination chat id
    #[serde(default = "default_chat_id_secret")]
    pub chat_id_secret: String,

    /// Send timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_http_url("telegram.api_base_url", &self.api_base_url)?;
        if self.bot_token_secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN_SECRET"));
        }
        if self.chat_id_secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__CHAT_ID_SECRET"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            bot_token_secret: default_bot_token_secret(),
            chat_id_secret: default_chat_id_secret(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_bot_token_secret() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}

fn default_chat_id_secret() -> String {
    "TELEGRAM_CHAT_ID".to_string()
}

fn default_timeout() -> u64 {
    10
}
