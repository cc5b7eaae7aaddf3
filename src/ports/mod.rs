//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! normalization core and the outside world. Adapters implement these ports.
//!
//! - `DirectoryService` - contact lookup by email or id
//! - `OrderSource` - subscription order fetch
//! - `SecretStore` - named secrets for the messaging API
//! - `AlertSender` - delivery of a rendered alert message

mod alert_sender;
mod directory;
mod order_source;
mod secret_store;

pub use alert_sender::{AlertSender, DeliveryError};
pub use directory::{DirectoryError, DirectoryService};
pub use order_source::{OrderError, OrderSource};
pub use secret_store::{SecretError, SecretStore};
