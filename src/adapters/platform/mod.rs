//! Platform API adapter - contacts directory and subscription orders.
//!
//! One HTTP client serves both ports:
//! - `GET {base}/contacts?email=...` -> `{ "items": [...] }`
//! - `GET {base}/contacts/{id}` -> contact record
//! - `GET {base}/orders/{id}` -> order record (or `{ "order": {...} }`)
//!
//! Without a configured base URL every lookup reports `Unavailable`, which
//! the resolvers treat like any other lookup failure.

mod client;

pub use client::HttpPlatformClient;
