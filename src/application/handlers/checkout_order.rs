//! CheckoutOrderHandler - store / e-commerce checkout orders paid.

use serde_json::Value;

use super::{contained, require_object};
use crate::application::{AlertDispatcher, AlertError, BuyerResolver};
use crate::domain::fields::{first_of, first_text, text_at, NULL};
use crate::domain::{Disposition, PaymentAlert, PaymentEventKind, PLACEHOLDER};

const KIND: PaymentEventKind = PaymentEventKind::CheckoutOrderPaid;

const SOURCE: &str = "Stores";

const BUYER_PATHS: &[&str] = &["buyerInfo", "buyer"];
const TOTAL_PATHS: &[&str] = &["priceSummary.total", "amountPaid", "totals.total"];
const ORDER_ID_PATHS: &[&str] = &["id", "number"];
const PLAN_PATHS: &[&str] = &["cart.lineItems.0.name"];

/// Amount of a checkout total: a bare number, or the object's `amount`
/// falling back to its `value`.
fn total_amount(total: &Value) -> Option<Value> {
    match total {
        Value::Number(_) | Value::String(_) => Some(total.clone()),
        Value::Object(_) => first_of(total, &["amount", "value"]).cloned(),
        _ => None,
    }
}

pub struct CheckoutOrderHandler {
    resolver: BuyerResolver,
    dispatcher: AlertDispatcher,
}

impl CheckoutOrderHandler {
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

        let order = first_of(event, &["order"]).unwrap_or(event);
        let buyer_record = first_of(order, BUYER_PATHS).unwrap_or(&NULL);
        let buyer = self.resolver.resolve_value(buyer_record).await;

        let total = first_of(order, TOTAL_PATHS);
        let currency = total
            .and_then(|t| text_at(t, "currency"))
            .or_else(|| text_at(order, "currency"));

        let alert = PaymentAlert::new(SOURCE, buyer)
            .with_plan(first_text(order, PLAN_PATHS).unwrap_or_else(|| PLACEHOLDER.to_string()))
            .with_raw_amount(total.and_then(total_amount), currency)
            .with_id(first_text(order, ORDER_ID_PATHS).unwrap_or_default());

        Ok(self.dispatcher.alert_payment(&alert).await)
    }
}
