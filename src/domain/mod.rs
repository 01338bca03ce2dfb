//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;

pub use api_key::{
    AccessDecision, ApiKeyValidationError, KeyEntry, KeyStore, ALL_MODELS, PLACEHOLDER_KEY,
};
pub use error::DomainError;
