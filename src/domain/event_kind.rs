//! Inbound event kinds and their accepted names.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which upstream occurrence a raw event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentEventKind {
    /// One-time pricing plan purchase.
    PlanPurchased,
    /// Subscription renewal cycle started.
    RenewalCycleStarted,
    /// Generic payment API status update.
    PaymentUpdated,
    /// Store/e-commerce checkout order paid.
    CheckoutOrderPaid,
    /// Billing invoice paid.
    InvoicePaid,
}

impl PaymentEventKind {
    pub const ALL: [PaymentEventKind; 5] = [
        PaymentEventKind::PlanPurchased,
        PaymentEventKind::RenewalCycleStarted,
        PaymentEventKind::PaymentUpdated,
        PaymentEventKind::CheckoutOrderPaid,
        PaymentEventKind::InvoicePaid,
    ];

    /// Every name the kind is delivered under, canonical name first.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            PaymentEventKind::PlanPurchased => {
                &["plan-purchased", "order-purchased", "purchase-completed"]
            }
            PaymentEventKind::RenewalCycleStarted => &[
                "order-cycle-started",
                "plan-cycle-started",
                "subscription-renewal-cycle-started",
            ],
            PaymentEventKind::PaymentUpdated => {
                &["payment-update", "generic-payment-status-update"]
            }
            PaymentEventKind::CheckoutOrderPaid => {
                &["store-order-paid", "ecom-order-paid", "checkout-order-paid"]
            }
            PaymentEventKind::InvoicePaid => &["invoice-paid"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.names()[0]
    }
}

impl fmt::Display for PaymentEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an event name no handler is registered under.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown payment event kind: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for PaymentEventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.names().contains(&needle.as_str()))
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}
