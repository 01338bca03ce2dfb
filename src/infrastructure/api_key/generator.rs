//! API Key generation
//!
//! Produces opaque, URL-safe bearer secrets from OS-seeded randomness.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

use crate::domain::api_key::MAX_SECRET_LENGTH;

/// Source of fresh secrets for newly issued keys
///
/// Implementations must return a different value on every call.
pub trait SecretGenerator: Send + Sync + std::fmt::Debug {
    fn generate(&self) -> String;
}

/// Generator for random API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated keys (e.g., "sk-")
    prefix: String,
    /// Number of random bytes to generate
    key_bytes: usize,
}

impl ApiKeyGenerator {
    pub const DEFAULT_PREFIX: &'static str = "sk-";
    pub const DEFAULT_KEY_BYTES: usize = 32;
    pub const MIN_KEY_BYTES: usize = 16;

    /// Create a new API key generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: Self::DEFAULT_KEY_BYTES,
        }
    }

    /// Set the number of random bytes
    ///
    /// Clamped to at least [`Self::MIN_KEY_BYTES`] and to at most what keeps
    /// the encoded secret within the stored secret length limit.
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        let max = Self::max_key_bytes(&self.prefix).max(Self::MIN_KEY_BYTES);
        self.key_bytes = bytes.clamp(Self::MIN_KEY_BYTES, max);
        self
    }

    /// Largest byte count whose unpadded base64 form fits after `prefix`
    pub fn max_key_bytes(prefix: &str) -> usize {
        // Every 3 bytes encode to 4 characters
        MAX_SECRET_LENGTH.saturating_sub(prefix.chars().count()) * 3 / 4
    }

    pub fn key_bytes(&self) -> usize {
        self.key_bytes
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl SecretGenerator for ApiKeyGenerator {
    fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        format!("{}{}", self.prefix, URL_SAFE_NO_PAD.encode(&random_bytes))
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic generator yielding `<prefix>1`, `<prefix>2`, ...
    #[derive(Debug)]
    pub struct SequentialGenerator {
        prefix: String,
        counter: AtomicUsize,
    }

    impl SequentialGenerator {
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                counter: AtomicUsize::new(0),
            }
        }
    }

    impl SecretGenerator for SequentialGenerator {
        fn generate(&self) -> String {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            format!("{}{}", self.prefix, n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::validate_secret;

    #[test]
    fn test_generate_key() {
        let generator = ApiKeyGenerator::default();
        let key = generator.generate();

        assert!(key.starts_with("sk-"));
        // 32 bytes base64-encoded = 43 chars, plus prefix
        assert_eq!(key.len(), "sk-".len() + 43);
        assert!(validate_secret(&key).is_ok());
    }

    #[test]
    fn test_generate_custom_prefix() {
        let generator = ApiKeyGenerator::new("pk_live_");
        assert!(generator.generate().starts_with("pk_live_"));
        assert_eq!(generator.prefix(), "pk_live_");
    }

    #[test]
    fn test_key_uniqueness() {
        let generator = ApiKeyGenerator::default();
        let keys: std::collections::HashSet<String> =
            (0..100).map(|_| generator.generate()).collect();

        assert_eq!(keys.len(), 100);
    }

    #[test]
    fn test_custom_key_bytes() {
        let generator = ApiKeyGenerator::default().with_key_bytes(64);
        // 64 bytes base64-encoded = 86 chars, plus prefix
        assert_eq!(generator.generate().len(), "sk-".len() + 86);

        let floor = ApiKeyGenerator::default().with_key_bytes(1);
        assert_eq!(floor.generate().len(), "sk-".len() + 22);
    }

    #[test]
    fn test_key_bytes_capped_to_secret_limit() {
        let generator = ApiKeyGenerator::default().with_key_bytes(400);
        assert_eq!(generator.key_bytes(), ApiKeyGenerator::max_key_bytes("sk-"));

        let key = generator.generate();
        assert!(key.chars().count() <= MAX_SECRET_LENGTH);
        assert!(validate_secret(&key).is_ok());

        // Largest allowed value still fits
        let at_limit = ApiKeyGenerator::new("pk_live_")
            .with_key_bytes(ApiKeyGenerator::max_key_bytes("pk_live_"));
        assert!(validate_secret(&at_limit.generate()).is_ok());
    }

    #[test]
    fn test_sequential_generator() {
        let generator = mock::SequentialGenerator::new("sk_test_");
        assert_eq!(generator.generate(), "sk_test_1");
        assert_eq!(generator.generate(), "sk_test_2");
    }
}
