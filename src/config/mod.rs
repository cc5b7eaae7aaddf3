//! Typed settings for the alert service.
//!
//! Everything is read from the process environment (plus an optional `.env`
//! file) with the `PAYMENT_ALERTS` prefix; `__` separates section and key,
//! as in `PAYMENT_ALERTS__POLICY__SITE_LABEL`. Every key has a default, so
//! an empty environment yields a runnable development configuration.
//!
//! ```no_run
//! use payment_alerts::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), payment_alerts::config::ConfigError>(())
//! ```

mod error;
mod platform;
mod policy;
mod server;
mod telegram;

pub use error::{ConfigError, ValidationError};
pub use platform::PlatformConfig;
pub use policy::AlertPolicy;
pub use server::{Environment, ServerConfig};
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "PAYMENT_ALERTS";

/// All settings, one field per section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Bot API endpoint and the names of its secrets
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Contacts and orders API; lookups are off without a base URL
    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub policy: AlertPolicy,
}

impl AppConfig {
    /// Reads `.env` when present, then the `PAYMENT_ALERTS__*` variables.
    ///
    /// Fails only when a value cannot be converted to its field type;
    /// semantic checks are left to [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Checks every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.telegram.validate()?;
        self.platform.validate()?;
        self.policy.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

/// Accepts absolute `http` and `https` URLs only.
pub(crate) fn validate_http_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
