//! PaymentUpdateHandler - generic payment API status updates.

use serde_json::Value;

use super::{contained, require_object};
use crate::application::{AlertDispatcher, AlertError, BuyerResolver};
use crate::domain::fields::{first_of, first_text, text_at, NULL};
use crate::domain::{Disposition, PaymentAlert, PaymentEventKind, SkipReason, PLACEHOLDER};

const KIND: PaymentEventKind = PaymentEventKind::PaymentUpdated;

const BUYER_PATHS: &[&str] = &["userInfo", "buyer"];
const AMOUNT_PATHS: &[&str] = &["amount", "price"];
const PAYMENT_ID_PATHS: &[&str] = &["id", "paymentId"];

/// Status fragments that mark an unsuccessful payment.
const UNSUCCESSFUL_STATUS_MARKERS: &[&str] = &["fail", "cancel"];

/// True for an empty, failed or cancelled status (case-insensitive).
pub(crate) fn is_unsuccessful(status: &str) -> bool {
    let status = status.to_lowercase();
    status.is_empty()
        || UNSUCCESSFUL_STATUS_MARKERS
            .iter()
            .any(|marker| status.contains(marker))
}

pub struct PaymentUpdateHandler {
    resolver: BuyerResolver,
    dispatcher: AlertDispatcher,
}

impl PaymentUpdateHandler {
    pub fn new(resolver: BuyerResolver, dispatcher: AlertDispatcher) -> Self {
        Self {
            resolver,
            dispatcher,
        }
    }

    pub async fn handle(&self, event: &Value) -> Disposition {
        contained(KIND, event, self.process(event)).await
    }

    async fn process(&self, event: &Value) -> Result<Disposition, AlertError> {
        require_object(KIND, event)?;

        let status = text_at(event, "status").unwrap_or_default();
        if is_unsuccessful(&status) {
            tracing::debug!(status = %status, "Ignoring unsuccessful payment update");
            return Ok(Disposition::Skipped(SkipReason::PaymentNotSuccessful {
                status,
            }));
        }

        let payment = first_of(event, &["payment"]).unwrap_or(&NULL);
        let buyer_record = first_of(payment, BUYER_PATHS).unwrap_or(&NULL);
        let buyer = self.resolver.resolve_value(buyer_record).await;

        let alert = PaymentAlert::new(format!("Pay API: {}", status), buyer)
            .with_plan(PLACEHOLDER)
            .with_raw_amount(
                first_of(payment, AMOUNT_PATHS).cloned(),
                text_at(payment, "currency"),
            )
            .with_id(first_text(payment, PAYMENT_ID_PATHS).unwrap_or_default());

        Ok(self.dispatcher.alert_payment(&alert).await)
    }
}
