//! API Key domain
//!
//! Key entries, the store contract that indexes them by name and by secret,
//! and the validation rules applied before anything is stored.

mod entity;
mod repository;
mod validation;

pub use entity::{mask_secret, AccessDecision, KeyEntry, ALL_MODELS, PLACEHOLDER_KEY};
pub use repository::KeyStore;
pub use validation::{
    validate_key_name, validate_model, validate_secret, ApiKeyValidationError,
    MAX_KEY_NAME_LENGTH, MAX_SECRET_LENGTH,
};

#[cfg(test)]
pub use repository::mock;
