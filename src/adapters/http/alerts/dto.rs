//! Request and response DTOs for the alert endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::Disposition;

/// Response of `GET /api/ping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub pong: bool,
    /// Unix time in milliseconds.
    pub ts: i64,
}

/// Query of `GET /api/testpayment`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestPaymentQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub plan: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
}

/// Response of `GET /api/testpayment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPaymentResponse {
    pub sent: bool,
}

/// Response of `POST /api/events/{kind}`.
#[derive(Debug, Clone, Serialize)]
pub struct EventAcceptedResponse {
    /// Canonical name of the handler the event was routed to.
    pub kind: String,
    #[serde(flatten)]
    pub outcome: Disposition,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
