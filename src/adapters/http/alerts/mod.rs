//! HTTP adapter for the payment alert endpoints.
//!
//! Exposes the health check, the manual test alert and the inbound event
//! endpoint that feeds the normalizers.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, EventAcceptedResponse, PingResponse, TestPaymentQuery, TestPaymentResponse,
};
pub use handlers::{ping, receive_event, test_payment, AlertApiError, AlertAppState};
pub use routes::{alert_router, alert_routes};
