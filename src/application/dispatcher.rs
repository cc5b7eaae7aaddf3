//! Alert Dispatcher - renders a canonical alert and hands it to the sender.

use std::sync::Arc;

use crate::domain::{Disposition, PaymentAlert};
use crate::ports::AlertSender;

/// Sends rendered payment alerts. Delivery failures are logged and reported
/// as [`Disposition::Failed`], never raised.
#[derive(Clone)]
pub struct AlertDispatcher {
    sender: Arc<dyn AlertSender>,
    site_label: String,
}

impl AlertDispatcher {
    pub fn new(sender: Arc<dyn AlertSender>, site_label: impl Into<String>) -> Self {
        Self {
            sender,
            site_label: site_label.into(),
        }
    }

    pub fn site_label(&self) -> &str {
        &self.site_label
    }

    pub async fn alert_payment(&self, alert: &PaymentAlert) -> Disposition {
        let text = alert.render(&self.site_label);

        match self.sender.send_message(&text).await {
            Ok(()) => {
                tracing::info!(source = %alert.source, id = %alert.id, "Payment alert delivered");
                Disposition::Delivered
            }
            Err(e) => {
                tracing::error!(
                    source = %alert.source,
                    id = %alert.id,
                    status = ?e.status(),
                    error = %e,
                    "Payment alert delivery failed"
                );
                Disposition::failed(e.to_string())
            }
        }
    }
}
