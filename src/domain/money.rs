//! Monetary Reconciler - amount/currency extraction across schema shapes.
//!
//! Each upstream source reports the paid amount differently: a bare number,
//! an object with `amount`/`value` and `currency`, a totals block, or only a
//! list of individual payments. The extractors here try those shapes in a
//! fixed order and return a [`MoneyResult`].

use serde::Serialize;
use serde_json::Value;

use super::fields::{first_of, first_text, get_path, text_at};
use super::PLACEHOLDER;

/// Amount and currency reconciled from an event.
///
/// `amount`, when present, is always a finite number.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoneyResult {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl MoneyResult {
    pub fn new(amount: Option<f64>, currency: Option<String>) -> Self {
        Self { amount, currency }
    }

    pub fn has_amount(&self) -> bool {
        self.amount.is_some()
    }
}

/// Keys that may hold a payment history list, in precedence order.
const PAYMENT_LIST_KEYS: &[&str] = &["payments", "paymentHistory"];

/// Where a single payment entry keeps its amount.
const PAYMENT_ENTRY_AMOUNT_PATHS: &[&str] = &["amount.amount", "amount.value", "amount"];

/// Where a single payment entry keeps its currency.
const PAYMENT_ENTRY_CURRENCY_PATHS: &[&str] =
    &["amount.currency", "amount.currencyCode", "currency", "currencyCode"];

/// Invoice amount candidates. Direct totals win over the payment history.
const INVOICE_AMOUNT_PATHS: &[&str] = &[
    "paidAmount.amount",
    "amountPaid.amount",
    "totalAmount.amount",
    "grandTotal.amount",
    "total.amount",
    "amount.amount",
    "amount.value",
    "amount.value.amount",
    "amount",
    "totals.total.amount",
    "toPay.amount",
    "amountDue.amount",
];

const INVOICE_CURRENCY_PATHS: &[&str] = &[
    "paidAmount.currency",
    "amountPaid.currency",
    "totalAmount.currency",
    "grandTotal.currency",
    "total.currency",
    "amount.currency",
    "amount.value.currency",
    "totals.total.currency",
    "toPay.currency",
    "amountDue.currency",
];

/// Payment sub-object of the enclosing invoice event.
const EVENT_PAYMENT_AMOUNT_PATHS: &[&str] =
    &["payment.amount.amount", "payment.amount.value", "payment.amount"];

const EVENT_PAYMENT_CURRENCY_PATHS: &[&str] = &["payment.amount.currency", "payment.currency"];

/// Invoice-level currency used when nothing more specific was found.
const INVOICE_DEFAULT_CURRENCY_PATHS: &[&str] = &["currency", "currencyCode", "totals.currency"];

/// Interprets a value as a finite number. Numeric strings are accepted.
pub fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Sums a payment history list.
///
/// The list is read from `payments`, else `paymentHistory`. Entries without
/// a numeric amount count as zero. The currency is the first one found
/// across entries. A zero total is reported as no amount.
pub fn sum_payments(record: &Value) -> MoneyResult {
    let list = PAYMENT_LIST_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null());

    let entries = match list {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return MoneyResult::default(),
    };

    let mut total = 0.0;
    let mut currency: Option<String> = None;
    for entry in entries {
        // First non-null shape decides; a non-numeric value contributes 0.
        let raw = PAYMENT_ENTRY_AMOUNT_PATHS
            .iter()
            .filter_map(|path| get_path(entry, path))
            .find(|value| !value.is_null());
        if let Some(amount) = raw.and_then(Value::as_f64) {
            total += amount;
        }
        if currency.is_none() {
            currency = first_text(entry, PAYMENT_ENTRY_CURRENCY_PATHS);
        }
    }

    let amount = if total == 0.0 || !total.is_finite() {
        None
    } else {
        Some(total)
    };
    MoneyResult::new(amount, currency)
}

/// Extracts the total of a subscription order.
///
/// The total comes from the pricing block (`pricing`, else `priceDetails`)
/// as `totalPrice` or `total`, else from the order's own `price`/`amount`.
/// It may be a bare number or an object carrying `amount`/`value`.
pub fn amount_from_order(order: &Value) -> MoneyResult {
    let pricing = ["pricing", "priceDetails"]
        .iter()
        .filter_map(|key| order.get(*key))
        .find(|value| is_truthy(value));

    let total = pricing
        .into_iter()
        .flat_map(|p| [p.get("totalPrice"), p.get("total")])
        .chain([order.get("price"), order.get("amount")])
        .flatten()
        .find(|value| is_truthy(value));

    let currency = total
        .and_then(|t| text_at(t, "currency"))
        .or_else(|| pricing.and_then(|p| text_at(p, "currency")))
        .or_else(|| text_at(order, "currency"));

    MoneyResult::new(total.and_then(total_amount), currency)
}

/// Reads the amount of a total that is either a number or an object with
/// `amount` or `value`.
pub fn total_amount(total: &Value) -> Option<f64> {
    match total {
        Value::Object(_) => first_of(total, &["amount", "value"]).and_then(numeric),
        other => numeric(other),
    }
}

/// Runs the full invoice cascade.
///
/// 1. direct amount fields on the invoice, in [`INVOICE_AMOUNT_PATHS`] order
/// 2. the summed payment history
/// 3. the payment sub-object of the enclosing event
///
/// The currency follows the same tiers and finally defaults to the
/// invoice-level currency.
pub fn invoice_amount(invoice: &Value, event: &Value) -> MoneyResult {
    let mut currency = first_text(invoice, INVOICE_CURRENCY_PATHS);
    let mut amount = first_numeric(invoice, INVOICE_AMOUNT_PATHS);

    if amount.is_none() {
        let summed = sum_payments(invoice);
        amount = summed.amount;
        currency = currency.or(summed.currency);
    }

    if amount.is_none() {
        amount = first_numeric(event, EVENT_PAYMENT_AMOUNT_PATHS);
        currency = currency.or_else(|| first_text(event, EVENT_PAYMENT_CURRENCY_PATHS));
    }

    let currency = currency.or_else(|| first_text(invoice, INVOICE_DEFAULT_CURRENCY_PATHS));
    MoneyResult::new(amount, currency)
}

fn first_numeric(record: &Value, paths: &[&str]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| get_path(record, path))
        .find_map(numeric)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Formats an amount for the alert message.
///
/// - a number renders with two decimals followed by the currency; a numeric
///   string is treated as a number too, where a strict reading of the event
///   format would render it as `0.00 <currency>`
/// - an object with a numeric `value` uses it, preferring its own currency
/// - an object with a non-null `amount` renders that amount verbatim
/// - otherwise `0.00 <currency>`, or the placeholder when there is no
///   currency either
pub fn format_money(amount: Option<&Value>, currency: Option<&str>) -> String {
    let currency = currency.filter(|c| !c.is_empty());

    match amount {
        Some(scalar @ (Value::Number(_) | Value::String(_))) => match numeric(scalar) {
            Some(n) => join_amount(&format!("{:.2}", n), currency),
            None => fallback_money(currency),
        },
        Some(Value::Object(obj)) => {
            let own_currency = obj.get("currency").and_then(Value::as_str).filter(|c| !c.is_empty());
            let currency = own_currency.or(currency);
            if let Some(value) = obj.get("value").and_then(Value::as_f64) {
                join_amount(&format!("{:.2}", value), currency)
            } else if let Some(raw) = obj.get("amount").filter(|a| !a.is_null()) {
                let raw = match raw {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                join_amount(&raw, currency)
            } else {
                fallback_money(currency)
            }
        }
        _ => fallback_money(currency),
    }
}

fn join_amount(amount: &str, currency: Option<&str>) -> String {
    format!("{} {}", amount, currency.unwrap_or_default())
        .trim()
        .to_string()
}

fn fallback_money(currency: Option<&str>) -> String {
    match currency {
        Some(c) => format!("0.00 {}", c),
        None => PLACEHOLDER.to_string(),
    }
}
