use thiserror::Error;

/// Core domain errors
///
/// Absence is never an error in this crate: lookups of unknown names or
/// secrets return `Ok(None)`, `Ok(false)` or a default value instead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// True for failures raised by a storage backend rather than by input
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl From<super::api_key::ApiKeyValidationError> for DomainError {
    fn from(err: super::api_key::ApiKeyValidationError) -> Self {
        Self::validation(err.to_string())
    }
}
