//! RenewalCycleHandler - subscription renewal cycle started.

use std::sync::Arc;

use serde_json::Value;

use super::{contained, require_object};
use crate::application::{AlertDispatcher, AlertError, BuyerResolver};
use crate::config::AlertPolicy;
use crate::domain::fields::{first_of, first_text, text_at, NULL};
use crate::domain::{amount_from_order, Disposition, PaymentAlert, PaymentEventKind, SkipReason};
use crate::domain::PLACEHOLDER;
use crate::ports::OrderSource;

const KIND: PaymentEventKind = PaymentEventKind::RenewalCycleStarted;

pub(crate) const SOURCE: &str = "Pricing Plans (Renewal)";

const ORDER_ID_PATHS: &[&str] = &["orderId", "order.id", "id"];

/// Title-like fields of a pricing plan order.
pub(crate) const PLAN_NAME_PATHS: &[&str] =
    &["plan.name", "planName", "plan.title", "plan.planName"];

/// Plan name of an order, or the placeholder.
pub(crate) fn plan_name(order: &Value) -> String {
    first_text(order, PLAN_NAME_PATHS).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Buyer record of an order, falling back to the event's own buyer.
pub(crate) fn order_buyer<'a>(order: &'a Value, event: &'a Value) -> &'a Value {
    first_of(order, &["buyer"])
        .or_else(|| first_of(event, &["buyer"]))
        .unwrap_or(&NULL)
}

/// Normalizes renewal events. Under the renewal policy an alert is only
/// sent when both the buyer email and the amount are known.
pub struct RenewalCycleHandler {
    resolver: BuyerResolver,
    orders: Arc<dyn OrderSource>,
    dispatcher: AlertDispatcher,
    policy: AlertPolicy,
}

impl RenewalCycleHandler {
    pub fn new(
        resolver: BuyerResolver,
        orders: Arc<dyn OrderSource>,
        dispatcher: AlertDispatcher,
        policy: AlertPolicy,
    ) -> Self {
        Self {
            resolver,
            orders,
            dispatcher,
            policy,
        }
    }

    pub async fn handle(&self, event: &Value) -> Disposition {
        contained(KIND, event, self.process(event)).await
    }

    async fn process(&self, event: &Value) -> Result<Disposition, AlertError> {
        require_object(KIND, event)?;

        let order_id = first_text(event, ORDER_ID_PATHS);
        let order = match first_of(event, &["order"]) {
            Some(order) => order.clone(),
            None => self.fetch_order(order_id.as_deref()).await,
        };

        let buyer = self.resolver.resolve_value(order_buyer(&order, event)).await;
        let plan = plan_name(&order);
        let money = amount_from_order(&order);

        if self.policy.require_email_for_renewals && !(buyer.has_email() && money.has_amount()) {
            let reason = SkipReason::RenewalIncomplete {
                has_email: buyer.has_email(),
                has_amount: money.has_amount(),
            };
            tracing::warn!(order_id = ?order_id, reason = %reason, "Skipping renewal alert");
            return Ok(Disposition::Skipped(reason));
        }

        let id = order_id
            .or_else(|| text_at(&order, "id"))
            .unwrap_or_default();
        let alert = PaymentAlert::new(SOURCE, buyer)
            .with_plan(plan)
            .with_money(money)
            .with_id(id);

        Ok(self.dispatcher.alert_payment(&alert).await)
    }

    async fn fetch_order(&self, order_id: Option<&str>) -> Value {
        let Some(order_id) = order_id else {
            return Value::Null;
        };
        match self.orders.get_order(order_id).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Order fetch failed");
                Value::Null
            }
        }
    }
}
