//! Event Normalizers - one handler per upstream source.
//!
//! Every handler maps a raw event into a [`PaymentAlert`](crate::domain::PaymentAlert) and hands it to the
//! [`AlertDispatcher`]. Each `handle` call is a failure boundary: errors and
//! panics inside the normalizer are logged with the event and reported as
//! [`Disposition::Failed`], never propagated to the caller.

mod checkout_order;
mod invoice_paid;
mod payment_update;
mod plan_purchased;
mod renewal_cycle;

pub use checkout_order::CheckoutOrderHandler;
pub use invoice_paid::InvoicePaidHandler;
pub use payment_update::PaymentUpdateHandler;
pub use plan_purchased::PlanPurchasedHandler;
pub use renewal_cycle::RenewalCycleHandler;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use super::{AlertDispatcher, AlertError, BuyerResolver};
use crate::config::AlertPolicy;
use crate::domain::{Disposition, PaymentEventKind};
use crate::ports::{AlertSender, DirectoryService, OrderSource};

/// Shared collaborators for the normalizers.
///
/// Cloned per request; handlers are created on demand from it.
#[derive(Clone)]
pub struct AlertServices {
    resolver: BuyerResolver,
    orders: Arc<dyn OrderSource>,
    dispatcher: AlertDispatcher,
    policy: AlertPolicy,
}

impl AlertServices {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        orders: Arc<dyn OrderSource>,
        sender: Arc<dyn AlertSender>,
        policy: AlertPolicy,
    ) -> Self {
        let dispatcher = AlertDispatcher::new(sender, policy.site_label.clone());
        Self {
            resolver: BuyerResolver::new(directory),
            orders,
            dispatcher,
            policy,
        }
    }

    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    pub fn plan_purchased_handler(&self) -> PlanPurchasedHandler {
        PlanPurchasedHandler::new(
            self.resolver.clone(),
            self.dispatcher.clone(),
            self.policy.clone(),
        )
    }

    pub fn renewal_cycle_handler(&self) -> RenewalCycleHandler {
        RenewalCycleHandler::new(
            self.resolver.clone(),
            self.orders.clone(),
            self.dispatcher.clone(),
            self.policy.clone(),
        )
    }

    pub fn payment_update_handler(&self) -> PaymentUpdateHandler {
        PaymentUpdateHandler::new(self.resolver.clone(), self.dispatcher.clone())
    }

    pub fn checkout_order_handler(&self) -> CheckoutOrderHandler {
        CheckoutOrderHandler::new(self.resolver.clone(), self.dispatcher.clone())
    }

    pub fn invoice_paid_handler(&self) -> InvoicePaidHandler {
        InvoicePaidHandler::new(self.resolver.clone(), self.dispatcher.clone())
    }

    /// Routes one raw event to the normalizer for its kind.
    pub async fn handle(&self, kind: PaymentEventKind, event: &Value) -> Disposition {
        match kind {
            PaymentEventKind::PlanPurchased => self.plan_purchased_handler().handle(event).await,
            PaymentEventKind::RenewalCycleStarted => {
                self.renewal_cycle_handler().handle(event).await
            }
            PaymentEventKind::PaymentUpdated => self.payment_update_handler().handle(event).await,
            PaymentEventKind::CheckoutOrderPaid => {
                self.checkout_order_handler().handle(event).await
            }
            PaymentEventKind::InvoicePaid => self.invoice_paid_handler().handle(event).await,
        }
    }
}

/// Runs a normalizer, containing its errors and panics.
pub(crate) async fn contained<F>(kind: PaymentEventKind, event: &Value, work: F) -> Disposition
where
    F: Future<Output = Result<Disposition, AlertError>>,
{
    let outcome = match AssertUnwindSafe(work).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(AlertError::Panicked {
            kind,
            message: panic_message(payload.as_ref()),
        }),
    };

    match outcome {
        Ok(disposition) => disposition,
        Err(e) => {
            tracing::error!(kind = %kind, error = %e, event = %event, "Payment event handler failed");
            Disposition::failed(e.to_string())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Rejects events that are not JSON objects.
pub(crate) fn require_object(kind: PaymentEventKind, event: &Value) -> Result<(), AlertError> {
    if event.is_object() {
        Ok(())
    } else {
        Err(AlertError::malformed(kind, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDirectory, InMemoryOrderSource, RecordingAlertSender};
    use serde_json::json;

    #[tokio::test]
    async fn contained_turns_errors_into_failed_disposition() {
        let event = json!([1, 2]);
        let disposition = contained(PaymentEventKind::InvoicePaid, &event, async {
            require_object(PaymentEventKind::InvoicePaid, &event).map(|_| Disposition::Delivered)
        })
        .await;

        assert_eq!(disposition.label(), "failed");
    }

    #[tokio::test]
    async fn contained_catches_panics() {
        let event = json!({});
        let disposition = contained(PaymentEventKind::InvoicePaid, &event, async {
            if event.is_object() {
                panic!("normalizer bug");
            }
            Ok::<_, AlertError>(Disposition::Delivered)
        })
        .await;

        match disposition {
            Disposition::Failed { error } => assert!(error.contains("normalizer bug")),
            other => panic!("unexpected disposition: {:?}", other),
        }
    }

    #[tokio::test]
    async fn routes_each_kind_to_its_handler() {
        let sender = Arc::new(RecordingAlertSender::new());
        let services = AlertServices::new(
            Arc::new(InMemoryDirectory::new()),
            Arc::new(InMemoryOrderSource::new()),
            sender.clone(),
            AlertPolicy::default(),
        );

        let purchase = services
            .handle(PaymentEventKind::PlanPurchased, &json!({"orderId": "o-1"}))
            .await;
        assert!(purchase.is_skipped());

        let checkout = services
            .handle(
                PaymentEventKind::CheckoutOrderPaid,
                &json!({"order": {"id": "o-2", "priceSummary": {"total": {"amount": 5, "currency": "USD"}}}}),
            )
            .await;
        assert!(checkout.is_delivered());
        assert_eq!(sender.sent_count(), 1);
    }

    #[tokio::test]
    async fn malformed_events_never_reach_the_sender() {
        let sender = Arc::new(RecordingAlertSender::new());
        let services = AlertServices::new(
            Arc::new(InMemoryDirectory::new()),
            Arc::new(InMemoryOrderSource::new()),
            sender.clone(),
            AlertPolicy::default(),
        );

        for kind in PaymentEventKind::ALL {
            let disposition = services.handle(kind, &json!("not an event")).await;
            assert!(!disposition.is_delivered(), "{} delivered", kind);
        }
        assert_eq!(sender.sent_count(), 0);
    }
}
