//! PlanPurchasedHandler - one-time pricing plan purchases.
//!
//! Purchases are normally suppressed because the same payment also arrives
//! through the invoice and checkout paths. With suppression cleared the
//! purchase is alerted like an order.

use serde_json::Value;

use super::renewal_cycle::{order_buyer, plan_name};
use super::{contained, require_object};
use crate::application::{AlertDispatcher, AlertError, BuyerResolver};
use crate::config::AlertPolicy;
use crate::domain::fields::{first_of, first_text, NULL};
use crate::domain::{amount_from_order, Disposition, PaymentAlert, PaymentEventKind, SkipReason};

const KIND: PaymentEventKind = PaymentEventKind::PlanPurchased;

const SOURCE: &str = "Pricing Plans (Purchase)";

const ORDER_ID_PATHS: &[&str] = &["order.id", "orderId", "id"];

pub struct PlanPurchasedHandler {
    resolver: BuyerResolver,
    dispatcher: AlertDispatcher,
    policy: AlertPolicy,
}

impl PlanPurchasedHandler {
    pub fn new(resolver: BuyerResolver, dispatcher: AlertDispatcher, policy: AlertPolicy) -> Self {
        Self {
            resolver,
            dispatcher,
            policy,
        }
    }

    pub async fn handle(&self, event: &Value) -> Disposition {
        contained(KIND, event, self.process(event)).await
    }

    async fn process(&self, event: &Value) -> Result<Disposition, AlertError> {
        let order_id = first_text(event, ORDER_ID_PATHS);

        if self.policy.suppress_plan_purchases {
            tracing::warn!(order_id = ?order_id, "Suppressed pricing plan purchase alert");
            return Ok(Disposition::Skipped(SkipReason::PurchaseSuppressed { order_id }));
        }

        require_object(KIND, event)?;

        let order = first_of(event, &["order"]).unwrap_or(&NULL);
        let buyer = self.resolver.resolve_value(order_buyer(order, event)).await;
        let alert = PaymentAlert::new(SOURCE, buyer)
            .with_plan(plan_name(order))
            .with_money(amount_from_order(order))
            .with_id(order_id.unwrap_or_default());

        Ok(self.dispatcher.alert_payment(&alert).await)
    }
}
