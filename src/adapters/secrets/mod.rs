//! Secret store adapters.

mod env_store;

pub use env_store::EnvSecretStore;
