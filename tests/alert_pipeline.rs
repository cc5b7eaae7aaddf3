//! Integration tests for the payment alert pipeline.
//!
//! These tests drive raw events through the HTTP surface and the normalizers
//! into a recording sender, with in-memory directory and order sources:
//! 1. Buyer resolution falls back to the directory
//! 2. Money is reconciled per source
//! 3. Policy skips and failures never reach the sender

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use payment_alerts::adapters::memory::{
    DirectoryCall, InMemoryDirectory, InMemoryOrderSource, RecordingAlertSender,
};
use payment_alerts::adapters::{alert_router, AlertAppState};
use payment_alerts::application::AlertServices;
use payment_alerts::config::AlertPolicy;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Pipeline {
    app: Router,
    sender: Arc<RecordingAlertSender>,
    directory: Arc<InMemoryDirectory>,
    orders: Arc<InMemoryOrderSource>,
}

impl Pipeline {
    fn new(directory: InMemoryDirectory, orders: InMemoryOrderSource) -> Self {
        Self::with_policy(directory, orders, AlertPolicy::default())
    }

    fn with_policy(
        directory: InMemoryDirectory,
        orders: InMemoryOrderSource,
        policy: AlertPolicy,
    ) -> Self {
        let sender = Arc::new(RecordingAlertSender::new());
        let directory = Arc::new(directory);
        let orders = Arc::new(orders);
        let services = AlertServices::new(
            directory.clone(),
            orders.clone(),
            sender.clone(),
            policy,
        );
        let app = alert_router().with_state(AlertAppState::new(services, sender.clone()));

        Self {
            app,
            sender,
            directory,
            orders,
        }
    }

    async fn post(&self, kind: &str, event: Value) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/events/{}", kind))
                    .header("content-type", "application/json")
                    .body(Body::from(event.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn only_message(&self) -> String {
        let sent = self.sender.sent();
        assert_eq!(sent.len(), 1, "expected exactly one alert, got {:?}", sent);
        sent[0].clone()
    }
}

fn contact(id: &str, first: &str, last: &str, email: &str) -> Value {
    json!({
        "id": id,
        "info": {"name": {"first": first, "last": last}},
        "primaryEmail": {"email": email}
    })
}

// =============================================================================
// Renewals
// =============================================================================

#[tokio::test]
async fn renewal_fetches_order_and_resolves_buyer_by_contact_id() {
    let orders = InMemoryOrderSource::new().with_order(
        "o-42",
        json!({
            "id": "o-42",
            "buyer": {"contactId": "c-7"},
            "planName": "Gold",
            "pricing": {"totalPrice": {"amount": "49.5", "currency": "EUR"}}
        }),
    );
    let directory =
        InMemoryDirectory::new().with_contact(contact("c-7", "Grace", "Hopper", "grace@example.com"));
    let pipeline = Pipeline::new(directory, orders);

    let (status, body) = pipeline
        .post("order-cycle-started", json!({"orderId": "o-42"}))
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["disposition"], "delivered");
    assert_eq!(pipeline.orders.requests(), vec!["o-42".to_string()]);
    assert_eq!(
        pipeline.directory.calls(),
        vec![DirectoryCall::ById("c-7".to_string())]
    );

    let message = pipeline.only_message();
    assert!(message.contains("Payment received (Pricing Plans (Renewal))"));
    assert!(message.contains("<b>Name:</b> Grace Hopper"));
    assert!(message.contains("<b>Email:</b> grace@example.com"));
    assert!(message.contains("<b>Plan:</b> Gold"));
    assert!(message.contains("<b>Amount:</b> 49.50 EUR"));
    assert!(message.contains("<b>ID:</b> o-42"));
}

#[tokio::test]
async fn renewal_without_email_is_skipped_when_directory_is_down() {
    let orders = InMemoryOrderSource::new().with_order(
        "o-1",
        json!({"buyer": {"contactId": "c-1"}, "pricing": {"total": 10}}),
    );
    let pipeline = Pipeline::new(InMemoryDirectory::failing(), orders);

    let (status, body) = pipeline
        .post("plan-cycle-started", json!({"orderId": "o-1"}))
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["disposition"], "skipped");
    assert_eq!(body["reason"], "renewal_incomplete");
    assert_eq!(body["has_email"], false);
    assert_eq!(pipeline.sender.attempts(), 0);
}

#[tokio::test]
async fn renewal_alerts_without_email_when_policy_relaxed() {
    let policy = AlertPolicy {
        require_email_for_renewals: false,
        ..AlertPolicy::default()
    };
    let pipeline = Pipeline::with_policy(
        InMemoryDirectory::failing(),
        InMemoryOrderSource::failing(),
        policy,
    );

    let (_, body) = pipeline
        .post("order-cycle-started", json!({"orderId": "o-9"}))
        .await;

    assert_eq!(body["disposition"], "delivered");
    let message = pipeline.only_message();
    assert!(message.contains("<b>Name:</b> —"));
    assert!(message.contains("<b>ID:</b> o-9"));
}

// =============================================================================
// Purchases
// =============================================================================

#[tokio::test]
async fn plan_purchases_are_suppressed_by_default() {
    let pipeline = Pipeline::new(InMemoryDirectory::new(), InMemoryOrderSource::new());

    let (status, body) = pipeline
        .post(
            "plan-purchased",
            json!({"order": {"id": "o-5", "buyer": {"email": "a@b.c"}, "pricing": {"total": 5}}}),
        )
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["reason"], "purchase_suppressed");
    assert_eq!(pipeline.sender.attempts(), 0);
    assert!(pipeline.directory.calls().is_empty());
}

// =============================================================================
// Checkout and invoices
// =============================================================================

#[tokio::test]
async fn checkout_order_resolves_name_from_email_lookup() {
    let directory =
        InMemoryDirectory::new().with_contact(contact("c-3", "Ada", "Lovelace", "ada@example.com"));
    let pipeline = Pipeline::new(directory, InMemoryOrderSource::new());

    let (_, body) = pipeline
        .post(
            "ecom-order-paid",
            json!({
                "order": {
                    "number": "1001",
                    "buyerInfo": {"email": "ada@example.com"},
                    "priceSummary": {"total": {"amount": "15", "currency": "USD"}},
                    "cart": {"lineItems": [{"name": "Poster <A3>"}]}
                }
            }),
        )
        .await;

    assert_eq!(body["kind"], "store-order-paid");
    assert_eq!(body["disposition"], "delivered");
    assert_eq!(
        pipeline.directory.calls(),
        vec![DirectoryCall::ByEmail("ada@example.com".to_string())]
    );

    let message = pipeline.only_message();
    assert!(message.contains("Payment received (Stores)"));
    assert!(message.contains("<b>Name:</b> Ada Lovelace"));
    assert!(message.contains("Poster &lt;A3&gt;"));
    assert!(message.contains("15.00 USD"));
}

#[tokio::test]
async fn invoice_sums_payment_history_and_derives_name_from_email() {
    let pipeline = Pipeline::new(InMemoryDirectory::new(), InMemoryOrderSource::new());

    let (_, body) = pipeline
        .post(
            "invoice-paid",
            json!({
                "invoice": {
                    "id": {"number": "INV-7"},
                    "title": "Consulting",
                    "customer": {"email": "jane.doe99@example.com"},
                    "payments": [
                        {"amount": {"amount": 30, "currency": "GBP"}},
                        {"amount": {"amount": 12.25}}
                    ]
                }
            }),
        )
        .await;

    assert_eq!(body["disposition"], "delivered");
    let message = pipeline.only_message();
    assert!(message.contains("Payment received (Invoice)"));
    assert!(message.contains("<b>Name:</b> Jane Doe99"));
    assert!(message.contains("<b>Plan:</b> Consulting"));
    assert!(message.contains("42.25 GBP"));
    assert!(message.contains("<b>ID:</b> INV-7"));
}

// =============================================================================
// Failure boundary
// =============================================================================

#[tokio::test]
async fn delivery_failure_is_reported_but_accepted() {
    let sender = Arc::new(RecordingAlertSender::rejecting(400));
    let services = AlertServices::new(
        Arc::new(InMemoryDirectory::new()),
        Arc::new(InMemoryOrderSource::new()),
        sender.clone(),
        AlertPolicy::default(),
    );
    let app = alert_router().with_state(AlertAppState::new(services, sender.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/events/payment-update")
                .body(Body::from(
                    json!({"status": "COMPLETED", "payment": {"amount": 3, "currency": "USD"}})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["disposition"], "failed");
    assert!(body["error"].as_str().unwrap().contains("400"));
    assert_eq!(sender.attempts(), 1);
}
