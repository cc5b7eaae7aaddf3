//! Payment Alerts - webhook normalization service
//!
//! Receives payment events from several upstream sources, each with its own
//! loosely structured payload, and turns every successful payment into one
//! chat notification with a resolved buyer and a reconciled amount.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
