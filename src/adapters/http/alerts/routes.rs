//! Axum router configuration for the alert endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{ping, receive_event, test_payment, AlertAppState};

/// Create the alert API routes.
///
/// # Routes
/// - `GET /ping` - Liveness check
/// - `GET /testpayment` - Send a synthetic alert
/// - `POST /events/:kind` - Deliver one raw payment event
pub fn alert_routes() -> Router<AlertAppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/testpayment", get(test_payment))
        .route("/events/:kind", post(receive_event))
}

/// Create the complete alert router, mounted under `/api`.
pub fn alert_router() -> Router<AlertAppState> {
    Router::new().nest("/api", alert_routes())
}
