//! HTTP adapters - REST API implementations.

pub mod alerts;

pub use alerts::alert_router;
pub use alerts::AlertAppState;
