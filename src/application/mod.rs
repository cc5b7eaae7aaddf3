//! Application layer - orchestrates buyer resolution, normalization and
//! alert dispatch around the ports.

mod buyer_resolver;
mod dispatcher;
mod error;
pub mod handlers;

pub use buyer_resolver::{BuyerResolver, LookupStep};
pub use dispatcher::AlertDispatcher;
pub use error::AlertError;
pub use handlers::AlertServices;
