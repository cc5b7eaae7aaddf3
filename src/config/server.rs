//! HTTP listener settings

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Longest request timeout accepted by validation.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where and how the webhook endpoints are served.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on
    pub host: String,

    pub port: u16,

    /// Deployment stage; production switches logs to JSON
    pub environment: Environment,

    /// `tracing` filter directive, used when `RUST_LOG` is unset
    pub log_level: String,

    /// Per-request timeout applied by the HTTP layer
    pub request_timeout_secs: u64,
}

/// Deployment stage
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Structured JSON logs outside of local development.
    pub fn json_logs(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl ServerConfig {
    /// Parses `host:port` into the listener address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ValidationError::InvalidBindAddress(addr))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,payment_alerts=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = ServerConfig::default();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparsable_host_is_rejected() {
        let config = ServerConfig {
            host: "webhooks.internal".to_string(),
            ..ServerConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidBindAddress(
                "webhooks.internal:8080".to_string()
            ))
        );
    }

    #[test]
    fn port_zero_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };

        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn request_timeout_must_be_within_bounds() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..ServerConfig::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout), "{}s", secs);
        }
    }

    #[test]
    fn only_production_logs_json() {
        assert!(Environment::Production.json_logs());
        assert!(!Environment::Staging.json_logs());
        assert!(!Environment::default().json_logs());
    }
}
