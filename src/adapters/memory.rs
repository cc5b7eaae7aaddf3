//! In-memory port implementations for tests and local runs.
//!
//! Supports:
//! - Pre-configured directory contacts and orders
//! - Error injection
//! - Call tracking for assertions

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;

use crate::domain::fields::first_text;
use crate::domain::ContactDetails;
use crate::ports::{
    AlertSender, DeliveryError, DirectoryError, DirectoryService, OrderError, OrderSource,
    SecretError, SecretStore,
};

/// Recorded directory call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    ByEmail(String),
    ById(String),
}

/// Directory holding raw contact records.
#[derive(Default)]
pub struct InMemoryDirectory {
    contacts: Vec<Value>,
    failing: bool,
    calls: Mutex<Vec<DirectoryCall>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory whose every lookup fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_contact(mut self, record: Value) -> Self {
        self.contacts.push(record);
        self
    }

    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DirectoryCall) -> Result<(), DirectoryError> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            Err(DirectoryError::Network("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectory {
    async fn query_by_email(&self, email: &str) -> Result<Vec<Value>, DirectoryError> {
        self.record(DirectoryCall::ByEmail(email.to_string()))?;
        Ok(self
            .contacts
            .iter()
            .filter(|record| {
                ContactDetails::from_record(record)
                    .email
                    .map(|e| e.eq_ignore_ascii_case(email))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, contact_id: &str) -> Result<Value, DirectoryError> {
        self.record(DirectoryCall::ById(contact_id.to_string()))?;
        self.contacts
            .iter()
            .find(|record| first_text(record, &["id", "_id"]).as_deref() == Some(contact_id))
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(contact_id.to_string()))
    }
}

/// Order source backed by a map of order id to raw order.
#[derive(Default)]
pub struct InMemoryOrderSource {
    orders: HashMap<String, Value>,
    failing: bool,
    requests: Mutex<Vec<String>>,
}

impl InMemoryOrderSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order_id: impl Into<String>, order: Value) -> Self {
        self.orders.insert(order_id.into(), order);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSource for InMemoryOrderSource {
    async fn get_order(&self, order_id: &str) -> Result<Value, OrderError> {
        self.requests.lock().unwrap().push(order_id.to_string());
        if self.failing {
            return Err(OrderError::Network("injected failure".to_string()));
        }
        self.orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }
}

/// Secret store backed by a fixed map.
#[derive(Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get(&self, name: &str) -> Result<SecretString, SecretError> {
        self.secrets
            .get(name)
            .map(|value| SecretString::new(value.clone()))
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }
}

/// How the recording sender answers.
#[derive(Debug, Clone, Copy, Default)]
enum SendMode {
    #[default]
    Accept,
    Reject(u16),
    Unreachable,
}

/// Alert sender that records every message it is given.
#[derive(Default)]
pub struct RecordingAlertSender {
    mode: SendMode,
    attempts: Mutex<Vec<String>>,
    delivered: Mutex<Vec<String>>,
}

impl RecordingAlertSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose messaging API answers with `status`.
    pub fn rejecting(status: u16) -> Self {
        Self {
            mode: SendMode::Reject(status),
            ..Self::default()
        }
    }

    /// A sender whose messaging API cannot be reached.
    pub fn unreachable() -> Self {
        Self {
            mode: SendMode::Unreachable,
            ..Self::default()
        }
    }

    /// Messages accepted for delivery.
    pub fn sent(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    /// Every send attempt, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl AlertSender for RecordingAlertSender {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(text.to_string());
        match self.mode {
            SendMode::Accept => {
                self.delivered.lock().unwrap().push(text.to_string());
                Ok(())
            }
            SendMode::Reject(status) => Err(DeliveryError::Rejected {
                status,
                body: "rejected".to_string(),
            }),
            SendMode::Unreachable => Err(DeliveryError::Transport("connection refused".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[tokio::test]
    async fn directory_matches_email_case_insensitively() {
        let directory = InMemoryDirectory::new()
            .with_contact(json!({"id": "c-1", "primaryEmail": {"email": "Ada@Example.com"}}));

        let found = directory.query_by_email("ada@example.com").await.unwrap();

        assert_eq!(found.len(), 1);
        assert!(directory.get_by_id("c-2").await.is_err());
    }

    #[tokio::test]
    async fn failing_directory_records_calls() {
        let directory = InMemoryDirectory::failing();

        assert!(directory.get_by_id("c-1").await.is_err());
        assert_eq!(directory.calls(), vec![DirectoryCall::ById("c-1".into())]);
    }

    #[tokio::test]
    async fn order_source_tracks_requests() {
        let orders = InMemoryOrderSource::new().with_order("o-1", json!({"id": "o-1"}));

        assert!(orders.get_order("o-1").await.is_ok());
        assert!(matches!(orders.get_order("o-2").await, Err(OrderError::NotFound(_))));
        assert_eq!(orders.requests(), vec!["o-1".to_string(), "o-2".to_string()]);
    }

    #[tokio::test]
    async fn static_secrets() {
        let store = StaticSecretStore::new().with_secret("TOKEN", "abc");

        assert_eq!(store.get("TOKEN").await.unwrap().expose_secret(), "abc");
        assert!(matches!(store.get("OTHER").await, Err(SecretError::Missing(_))));
    }

    #[tokio::test]
    async fn unreachable_sender_delivers_nothing() {
        let sender = RecordingAlertSender::unreachable();

        assert!(sender.send_message("hello").await.is_err());
        assert_eq!(sender.attempts(), 1);
        assert_eq!(sender.sent_count(), 0);
    }
}
