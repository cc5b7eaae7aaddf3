//! Telegram Bot API sender.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::config::TelegramConfig;
use crate::ports::{AlertSender, DeliveryError, SecretStore};

/// Request body of `sendMessage`.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Sends HTML alerts to a Telegram chat.
pub struct TelegramAlertSender {
    client: Client,
    secrets: Arc<dyn SecretStore>,
    api_base_url: String,
    bot_token_secret: String,
    chat_id_secret: String,
}

impl TelegramAlertSender {
    pub fn new(config: &TelegramConfig, secrets: Arc<dyn SecretStore>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            secrets,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token_secret: config.bot_token_secret.clone(),
            chat_id_secret: config.chat_id_secret.clone(),
        })
    }

    fn send_message_url(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, token)
    }
}

#[async_trait]
impl AlertSender for TelegramAlertSender {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let token = self.secrets.get(&self.bot_token_secret).await?;
        let chat_id = self.secrets.get(&self.chat_id_secret).await?;

        let body = SendMessageRequest {
            chat_id: chat_id.expose_secret(),
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.send_message_url(token.expose_secret()))
            .json(&body)
            .send()
            .await
            // The URL carries the bot token.
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
