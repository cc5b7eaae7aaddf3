//! InvoicePaidHandler - billing invoices paid.
//!
//! Invoices reach us through several producing paths with structurally
//! different payloads, so id, payer, title and amount are each read from an
//! ordered table of candidate fields.

use serde_json::Value;

use super::{contained, require_object};
use crate::application::{AlertDispatcher, AlertError, BuyerResolver};
use crate::domain::fields::{first_of, first_str, first_text, value_text};
use crate::domain::{
    email_derived_name, invoice_amount, BuyerCandidate, Disposition, PaymentAlert,
    PaymentEventKind, ResolvedBuyer, PLACEHOLDER,
};

const KIND: PaymentEventKind = PaymentEventKind::InvoicePaid;

const SOURCE: &str = "Invoice";

const INVOICE_ID_PATHS: &[&str] = &["id", "_id", "number", "invoiceId", "metadata.id", "invoice.id"];

/// Sub-fields of an object-valued id, in precedence order.
const NESTED_ID_KEYS: &[&str] = &["id", "_id", "number"];

const FIRST_NAME_PATHS: &[&str] = &[
    "buyer.firstName",
    "customer.firstName",
    "issuedTo.firstName",
    "payer.firstName",
    "recipient.firstName",
];

const LAST_NAME_PATHS: &[&str] = &[
    "buyer.lastName",
    "customer.lastName",
    "issuedTo.lastName",
    "payer.lastName",
    "recipient.lastName",
];

const FULL_NAME_PATHS: &[&str] = &[
    "buyer.name",
    "buyer.fullName",
    "customer.name",
    "customer.fullName",
    "issuedTo.name",
    "issuedTo.fullName",
    "payer.name",
    "payer.fullName",
    "recipient.name",
    "recipient.fullName",
];

const EMAIL_PATHS: &[&str] = &[
    "buyer.email",
    "customer.email",
    "issuedTo.email",
    "payer.email",
    "recipient.email",
];

const CONTACT_ID_PATHS: &[&str] = &[
    "buyer.contactId",
    "buyer.contactID",
    "customer.contactId",
    "customer.contactID",
    "issuedTo.contactId",
    "issuedTo.contactID",
    "payer.contactId",
    "payer.contactID",
    "recipient.contactId",
    "recipient.contactID",
    "contactId",
];

/// Subject-like fields shown as the alert's plan line.
const TITLE_PATHS: &[&str] = &[
    "title",
    "description",
    "memo",
    "subject",
    "lineItems.0.name",
    "lineItems.0.description",
];

/// Resolves the invoice id to a scalar string.
///
/// An object-valued id is reduced to its `id`, `_id` or `number` field and
/// only rendered as JSON when none of those exist.
pub(crate) fn invoice_id(invoice: &Value) -> String {
    match first_of(invoice, INVOICE_ID_PATHS) {
        Some(id @ Value::Object(_)) => {
            first_text(id, NESTED_ID_KEYS).unwrap_or_else(|| id.to_string())
        }
        Some(id) => value_text(id),
        None => String::new(),
    }
}

/// Collects the payer across the five payer-role groups.
pub(crate) fn payer_candidate(invoice: &Value) -> BuyerCandidate {
    BuyerCandidate {
        first_name: first_str(invoice, FIRST_NAME_PATHS),
        last_name: first_str(invoice, LAST_NAME_PATHS),
        name: first_str(invoice, FULL_NAME_PATHS),
        email: first_str(invoice, EMAIL_PATHS),
        contact_id: first_text(invoice, CONTACT_ID_PATHS),
    }
}

/// Never leaves a known email without a display name.
fn ensure_name(buyer: ResolvedBuyer) -> ResolvedBuyer {
    if buyer.has_email() && !buyer.has_name() {
        ResolvedBuyer {
            name: email_derived_name(&buyer.email),
            ..buyer
        }
    } else {
        buyer
    }
}

pub struct InvoicePaidHandler {
    resolver: BuyerResolver,
    dispatcher: AlertDispatcher,
}

impl InvoicePaidHandler {
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

        let invoice = first_of(event, &["invoice"]).unwrap_or(event);
        let buyer = ensure_name(self.resolver.resolve(payer_candidate(invoice)).await);
        let plan = first_text(invoice, TITLE_PATHS).unwrap_or_else(|| PLACEHOLDER.to_string());

        let alert = PaymentAlert::new(SOURCE, buyer)
            .with_plan(plan)
            .with_money(invoice_amount(invoice, event))
            .with_id(invoice_id(invoice));

        Ok(self.dispatcher.alert_payment(&alert).await)
    }
}
