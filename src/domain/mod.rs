//! Domain layer - pure normalization logic over raw payment events.
//!
//! Nothing here performs I/O. Directory lookups and message delivery live
//! behind the ports and are orchestrated by the application layer.

pub mod alert;
pub mod buyer;
pub mod event_kind;
pub mod fields;
pub mod money;

pub use alert::{escape_html, Disposition, PaymentAlert, SkipReason};
pub use buyer::{email_derived_name, BuyerCandidate, ContactDetails, ResolvedBuyer};
pub use event_kind::{PaymentEventKind, UnknownEventKind};
pub use fields::{first_of, first_of_or, first_str, first_text, get_path, value_text};
pub use money::{
    amount_from_order, format_money, invoice_amount, sum_payments, MoneyResult,
};

/// Shown wherever a displayable field has no value.
pub const PLACEHOLDER: &str = "—";
