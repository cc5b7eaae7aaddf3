//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the normalization core to external systems:
//! - `telegram` - alert delivery through the Telegram Bot API
//! - `platform` - contacts directory and order lookups over HTTP
//! - `secrets` - environment-backed secret store
//! - `memory` - in-memory ports for tests and local runs
//! - `http` - the Axum endpoints

pub mod http;
pub mod memory;
pub mod platform;
pub mod secrets;
pub mod telegram;

pub use http::{alert_router, AlertAppState};
pub use platform::HttpPlatformClient;
pub use secrets::EnvSecretStore;
pub use telegram::TelegramAlertSender;
