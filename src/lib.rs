//! Key Registry
//!
//! Authorization backing store for an LLM gateway:
//! - API keys registered under named identities
//! - Lookup by presented secret or by name, kept consistent on rotation
//! - Per-key model grants and active status
//! - Configuration-time seeding and key issuance

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{AccessDecision, DomainError, KeyEntry, KeyStore, ALL_MODELS, PLACEHOLDER_KEY};
pub use infrastructure::api_key::{ApiKeyGenerator, InMemoryKeyStore, KeyManager, SecretGenerator};
