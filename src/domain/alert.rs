//! Canonical payment alert, message rendering and handler dispositions.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::buyer::ResolvedBuyer;
use super::money::{format_money, MoneyResult};
use super::PLACEHOLDER;

/// The unified record every source is normalized into.
///
/// Built fresh per event and discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentAlert {
    pub source: String,
    pub name: String,
    pub email: String,
    pub plan: String,
    /// A number, or a structured amount object as delivered upstream.
    pub amount: Option<Value>,
    pub currency: Option<String>,
    pub id: String,
}

impl PaymentAlert {
    pub fn new(source: impl Into<String>, buyer: ResolvedBuyer) -> Self {
        Self {
            source: source.into(),
            name: buyer.name,
            email: buyer.email,
            plan: PLACEHOLDER.to_string(),
            amount: None,
            currency: None,
            id: String::new(),
        }
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = plan.into();
        self
    }

    pub fn with_money(mut self, money: MoneyResult) -> Self {
        self.amount = money.amount.map(Value::from);
        self.currency = money.currency;
        self
    }

    pub fn with_raw_amount(mut self, amount: Option<Value>, currency: Option<String>) -> Self {
        self.amount = amount;
        self.currency = currency;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Formatted amount as shown in the message.
    pub fn money_text(&self) -> String {
        format_money(self.amount.as_ref(), self.currency.as_deref())
    }

    /// Renders the fixed HTML layout. Every interpolated field is escaped.
    pub fn render(&self, site_label: &str) -> String {
        [
            format!("<b>✅ Payment received ({})</b>", escape_html(&self.source)),
            format!("🌐 <b>Site:</b> {}", escape_html(site_label)),
            format!("👤 <b>Name:</b> {}", escape_html(or_placeholder(&self.name))),
            format!("📧 <b>Email:</b> {}", escape_html(or_placeholder(&self.email))),
            format!("🗒️ <b>Plan:</b> {}", escape_html(or_placeholder(&self.plan))),
            format!("💵 <b>Amount:</b> {}", escape_html(&self.money_text())),
            format!("🧾 <b>ID:</b> {}", escape_html(or_placeholder(&self.id))),
        ]
        .join("\n")
    }
}

fn or_placeholder(s: &str) -> &str {
    if s.is_empty() {
        PLACEHOLDER
    } else {
        s
    }
}

/// Escapes `&`, `<` and `>` for the messaging API's HTML mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Why an event produced no alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// One-time plan purchases are dropped in favour of invoice/checkout.
    PurchaseSuppressed { order_id: Option<String> },
    /// Renewal lacked an email or an amount.
    RenewalIncomplete { has_email: bool, has_amount: bool },
    /// Payment status was empty, failed or cancelled.
    PaymentNotSuccessful { status: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PurchaseSuppressed { order_id } => write!(
                f,
                "plan purchase alert suppressed for order {}",
                order_id.as_deref().unwrap_or(PLACEHOLDER)
            ),
            SkipReason::RenewalIncomplete {
                has_email,
                has_amount,
            } => write!(
                f,
                "renewal requires email and amount (email: {}, amount: {})",
                has_email, has_amount
            ),
            SkipReason::PaymentNotSuccessful { status } => {
                write!(f, "payment status '{}' is not a success", status)
            }
        }
    }
}

/// Outcome of handling one event.
///
/// Returned internally for testability; the inbound contract stays
/// fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum Disposition {
    Delivered,
    Skipped(SkipReason),
    Failed { error: String },
}

impl Disposition {
    pub fn failed(error: impl Into<String>) -> Self {
        Disposition::Failed {
            error: error.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Disposition::Delivered)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Disposition::Skipped(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Disposition::Delivered => "delivered",
            Disposition::Skipped(_) => "skipped",
            Disposition::Failed { .. } => "failed",
        }
    }
}
