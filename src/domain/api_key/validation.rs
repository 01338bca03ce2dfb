//! API Key validation utilities

use thiserror::Error;

use super::entity::PLACEHOLDER_KEY;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("API key name cannot start or end with whitespace")]
    UntrimmedName,

    #[error("API key secret cannot be empty")]
    EmptySecret,

    #[error("API key secret exceeds maximum length of {0} characters")]
    SecretTooLong(usize),

    #[error("API key secret '{0}' is reserved")]
    ReservedSecret(&'static str),

    #[error("Model identifier cannot be empty")]
    EmptyModel,

    #[error("{field} contains invalid character: {character:?}")]
    InvalidCharacter { field: &'static str, character: char },
}

pub const MAX_KEY_NAME_LENGTH: usize = 128;
pub const MAX_SECRET_LENGTH: usize = 512;

/// Validate the identity name a key is registered under
///
/// Rules:
/// - Cannot be empty
/// - Maximum 128 characters
/// - No leading or trailing whitespace
/// - No control characters
pub fn validate_key_name(name: &str) -> Result<(), ApiKeyValidationError> {
    if name.is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    if name.chars().count() > MAX_KEY_NAME_LENGTH {
        return Err(ApiKeyValidationError::NameTooLong(MAX_KEY_NAME_LENGTH));
    }

    if name.trim() != name {
        return Err(ApiKeyValidationError::UntrimmedName);
    }

    if let Some(c) = name.chars().find(|c| c.is_control()) {
        return Err(ApiKeyValidationError::InvalidCharacter {
            field: "API key name",
            character: c,
        });
    }

    Ok(())
}

/// Validate a bearer secret
///
/// Rules:
/// - Cannot be empty
/// - Maximum 512 characters
/// - No whitespace or control characters
/// - Cannot be the placeholder returned for unknown names
pub fn validate_secret(secret: &str) -> Result<(), ApiKeyValidationError> {
    if secret.is_empty() {
        return Err(ApiKeyValidationError::EmptySecret);
    }

    if secret == PLACEHOLDER_KEY {
        return Err(ApiKeyValidationError::ReservedSecret(PLACEHOLDER_KEY));
    }

    if secret.chars().count() > MAX_SECRET_LENGTH {
        return Err(ApiKeyValidationError::SecretTooLong(MAX_SECRET_LENGTH));
    }

    if let Some(c) = secret
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ApiKeyValidationError::InvalidCharacter {
            field: "API key secret",
            character: c,
        });
    }

    Ok(())
}

/// Validate a model identifier before it is granted
pub fn validate_model(model: &str) -> Result<(), ApiKeyValidationError> {
    if model.is_empty() {
        return Err(ApiKeyValidationError::EmptyModel);
    }

    if let Some(c) = model.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(ApiKeyValidationError::InvalidCharacter {
            field: "Model identifier",
            character: c,
        });
    }

    Ok(())
}
