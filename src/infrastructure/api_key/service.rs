//! Key manager
//!
//! Caller-facing operations over a [`KeyStore`]: issuing keys, granting
//! models and answering per-request authorization questions.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::api_key::{mask_secret, AccessDecision, KeyEntry, KeyStore, PLACEHOLDER_KEY};
use crate::domain::DomainError;

use super::generator::{ApiKeyGenerator, SecretGenerator};

/// Policy facade over one key store
#[derive(Debug, Clone)]
pub struct KeyManager {
    store: Arc<dyn KeyStore>,
    generator: Arc<dyn SecretGenerator>,
}

impl KeyManager {
    /// Create a key manager using the default generator
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self {
            store,
            generator: Arc::new(ApiKeyGenerator::default()),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: Arc<dyn SecretGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn KeyStore> {
        &self.store
    }

    /// Models the presented secret may use
    ///
    /// Empty for unknown secrets as well as for keys without grants.
    pub async fn allowed_models_for(&self, secret: &str) -> Result<Vec<String>, DomainError> {
        let entry = self.store.get_by_secret(secret).await?;

        if entry.is_none() {
            debug!(secret = %mask_secret(secret), "Unknown API key presented");
        }

        Ok(entry
            .map(|e| e.allowed_models().to_vec())
            .unwrap_or_default())
    }

    /// Grant a model to the key registered under `name`
    pub async fn grant_model(&self, name: &str, model: &str) -> Result<bool, DomainError> {
        let added = self.store.grant_model(name, model).await?;

        if added {
            info!("Granted model: name={}, model={}", name, model);
        } else {
            debug!(
                "Model not granted (already present or unknown key): name={}, model={}",
                name, model
            );
        }

        Ok(added)
    }

    /// Issue a fresh secret for `name` and return it
    ///
    /// Reissuing for a name that already holds a key rotates it: the previous
    /// secret stops resolving and the model grants start over.
    pub async fn issue_key(&self, name: &str) -> Result<String, DomainError> {
        self.issue(name, None).await
    }

    /// Issue a fresh secret for `name` with a description
    pub async fn issue_key_with_description(
        &self,
        name: &str,
        description: impl Into<String>,
    ) -> Result<String, DomainError> {
        self.issue(name, Some(description.into())).await
    }

    async fn issue(&self, name: &str, description: Option<String>) -> Result<String, DomainError> {
        let secret = self.generator.generate();

        let entry = self
            .store
            .create_or_replace(name, &secret, description)
            .await?;

        info!(
            "API key issued: name={}, secret={}",
            name,
            entry.masked_secret()
        );

        Ok(secret)
    }

    /// Current secret registered under `name`, or [`PLACEHOLDER_KEY`]
    pub async fn current_key_for(&self, name: &str) -> Result<String, DomainError> {
        Ok(self
            .store
            .get_by_name(name)
            .await?
            .map(|e| e.secret().to_string())
            .unwrap_or_else(|| PLACEHOLDER_KEY.to_string()))
    }

    /// Activate or deactivate the key registered under `name`
    pub async fn set_active(&self, name: &str, active: bool) -> Result<(), DomainError> {
        info!("Setting API key active status: name={}, active={}", name, active);
        self.store.set_active(name, active).await
    }

    /// All registered keys in registration order
    pub async fn list_all(&self) -> Result<Vec<(String, KeyEntry)>, DomainError> {
        self.store.list_all().await
    }

    /// Load a batch of named entries, e.g. from configuration
    pub async fn seed(&self, entries: Vec<(String, KeyEntry)>) -> Result<(), DomainError> {
        let count = entries.len();
        self.store.create_or_replace_batch(entries).await?;
        info!("Seeded {} API key(s)", count);
        Ok(())
    }

    /// Decide whether the presented secret may use `model`
    ///
    /// Inactive keys are denied before their grants are considered.
    pub async fn check_access(
        &self,
        secret: &str,
        model: &str,
    ) -> Result<AccessDecision, DomainError> {
        let Some((name, entry)) = self.store.find_by_secret(secret).await? else {
            debug!(secret = %mask_secret(secret), model, "Access denied: unknown key");
            return Ok(AccessDecision::UnknownKey);
        };

        let decision = if !entry.is_active() {
            AccessDecision::Inactive { name }
        } else if entry.allows_model(model) {
            AccessDecision::Allowed { name }
        } else {
            AccessDecision::ModelNotAllowed { name }
        };

        debug!(model, %decision, "Access checked");
        Ok(decision)
    }
}
