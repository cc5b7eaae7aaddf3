//! HTTP handlers for the alert endpoints.
//!
//! These handlers connect Axum routes to the normalizers and the alert sender.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::application::AlertServices;
use crate::domain::{PaymentAlert, PaymentEventKind, ResolvedBuyer, UnknownEventKind};
use crate::ports::{AlertSender, DeliveryError};

use super::dto::{
    ErrorResponse, EventAcceptedResponse, PingResponse, TestPaymentQuery, TestPaymentResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the alert endpoints. Cloned per request.
#[derive(Clone)]
pub struct AlertAppState {
    pub services: AlertServices,
    pub sender: Arc<dyn AlertSender>,
}

impl AlertAppState {
    pub fn new(services: AlertServices, sender: Arc<dyn AlertSender>) -> Self {
        Self { services, sender }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/ping - Liveness check
pub async fn ping() -> impl IntoResponse {
    Json(PingResponse {
        pong: true,
        ts: chrono::Utc::now().timestamp_millis(),
    })
}

/// GET /api/testpayment - Send a synthetic alert straight to the chat
pub async fn test_payment(
    State(state): State<AlertAppState>,
    Query(query): Query<TestPaymentQuery>,
) -> Result<impl IntoResponse, AlertApiError> {
    let amount = match query.amount.as_deref() {
        None => 20.0,
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| AlertApiError::InvalidAmount(raw.to_string()))?,
    };

    let buyer = ResolvedBuyer {
        name: query.name.unwrap_or_else(|| "Test Buyer".to_string()),
        email: query.email.unwrap_or_else(|| "test@example.com".to_string()),
    };
    let alert = PaymentAlert::new("TEST", buyer)
        .with_plan(query.plan.unwrap_or_else(|| "Test Plan".to_string()))
        .with_raw_amount(
            Some(Value::from(amount)),
            Some(query.currency.unwrap_or_else(|| "USD".to_string())),
        )
        .with_id(format!("TEST-{}", chrono::Utc::now().timestamp_millis()));

    let text = alert.render(state.services.dispatcher().site_label());

    match state.sender.send_message(&text).await {
        Ok(()) => Ok(Json(TestPaymentResponse { sent: true })),
        Err(DeliveryError::Rejected { status, body }) => {
            tracing::warn!(status, body = %body, "Test alert rejected by messaging API");
            Ok(Json(TestPaymentResponse { sent: false }))
        }
        Err(e) => Err(AlertApiError::Delivery(e)),
    }
}

/// POST /api/events/{kind} - Feed one raw event to its normalizer
///
/// Always answers 202 for a known kind; the body reports what happened.
/// A body that is not valid JSON is handed over as a string and fails inside
/// the normalizer boundary.
pub async fn receive_event(
    State(state): State<AlertAppState>,
    Path(kind): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AlertApiError> {
    let kind: PaymentEventKind = kind.parse()?;
    let event = serde_json::from_slice::<Value>(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

    let outcome = state.services.handle(kind, &event).await;
    tracing::debug!(kind = %kind, disposition = outcome.label(), "Payment event handled");

    Ok((
        StatusCode::ACCEPTED,
        Json(EventAcceptedResponse {
            kind: kind.as_str().to_string(),
            outcome,
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts endpoint failures to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AlertApiError {
    #[error(transparent)]
    UnknownKind(#[from] UnknownEventKind),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Alert delivery failed: {0}")]
    Delivery(DeliveryError),
}

impl IntoResponse for AlertApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self {
            AlertApiError::UnknownKind(_) => (StatusCode::NOT_FOUND, "UNKNOWN_EVENT_KIND"),
            AlertApiError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            AlertApiError::Delivery(e) => {
                tracing::error!(error = %e, "Test alert could not be sent");
                (StatusCode::INTERNAL_SERVER_ERROR, "DELIVERY_FAILED")
            }
        };

        let body = ErrorResponse::new(error_code, self.to_string());
        (status, Json(body)).into_response()
    }
}
