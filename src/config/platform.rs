//! Platform API configuration (contacts directory and orders)

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use super::validate_http_url;

/// Platform API configuration.
///
/// Lookups are disabled when `base_url` is unset; buyer resolution then
/// works from the event payload alone.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API
    pub base_url: Option<String>,

    /// Bearer token for the platform API
    pub api_key: Option<SecretString>,

    /// Lookup timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl PlatformConfig {
    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    /// Validate platform configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.base_url {
            validate_http_url("platform.base_url", url)?;
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
