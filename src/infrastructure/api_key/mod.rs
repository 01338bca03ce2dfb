//! API Key infrastructure
//!
//! In-memory key store, secret generation and the key manager.

mod generator;
mod repository;
mod service;

pub use generator::{ApiKeyGenerator, SecretGenerator};
pub use repository::InMemoryKeyStore;
pub use service::KeyManager;
