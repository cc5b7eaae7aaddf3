//! Alert policy switches

use serde::Deserialize;

use super::error::ValidationError;

/// Read-only policy applied by the normalizers.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertPolicy {
    /// Drop one-time plan purchase events; invoice and checkout events
    /// already report those payments.
    #[serde(default = "default_true")]
    pub suppress_plan_purchases: bool,

    /// Only alert renewals that carry both an email and an amount.
    #[serde(default = "default_true")]
    pub require_email_for_renewals: bool,

    /// Static site label shown in every alert
    #[serde(default = "default_site_label")]
    pub site_label: String,
}

impl AlertPolicy {
    /// Validate policy configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.site_label.trim().is_empty() {
            return Err(ValidationError::MissingRequired("POLICY__SITE_LABEL"));
        }
        Ok(())
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            suppress_plan_purchases: true,
            require_email_for_renewals: true,
            site_label: default_site_label(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_site_label() -> String {
    "hts20.net".to_string()
}
