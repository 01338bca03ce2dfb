//! In-memory key store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::api_key::{
    validate_key_name, validate_model, validate_secret, KeyEntry, KeyStore,
};
use crate::domain::DomainError;

/// The forward map, its derived reverse index and the registration order.
///
/// Invariant: `secret_to_name == { e.secret: name | (name, e) in entries_by_name }`
/// and `order` holds every key of `entries_by_name` exactly once.
#[derive(Debug, Default, Clone)]
struct KeyIndex {
    entries_by_name: HashMap<String, KeyEntry>,
    secret_to_name: HashMap<String, String>,
    order: Vec<String>,
}

impl KeyIndex {
    fn find_by_secret(&self, secret: &str) -> Option<(&String, &KeyEntry)> {
        let name = self.secret_to_name.get(secret)?;
        self.entries_by_name.get(name).map(|entry| (name, entry))
    }

    /// Store `entry` under `name`, evicting the reverse mapping of a replaced secret.
    ///
    /// Nothing is modified when an error is returned.
    fn put(&mut self, name: &str, mut entry: KeyEntry) -> Result<(), DomainError> {
        validate_key_name(name)?;
        validate_secret(entry.secret())?;
        for model in entry.allowed_models() {
            validate_model(model)?;
        }
        entry.dedup_models();

        if let Some(owner) = self.secret_to_name.get(entry.secret()) {
            if owner != name {
                return Err(DomainError::conflict(format!(
                    "Secret {} is already assigned to key '{}'",
                    entry.masked_secret(),
                    owner
                )));
            }
        }

        match self.entries_by_name.get(name) {
            Some(previous) if previous.secret() != entry.secret() => {
                debug!(
                    name,
                    old_secret = %previous.masked_secret(),
                    "Evicting rotated secret from reverse index"
                );
                self.secret_to_name.remove(previous.secret());
            }
            Some(_) => {}
            None => self.order.push(name.to_string()),
        }

        self.secret_to_name
            .insert(entry.secret().to_string(), name.to_string());
        self.entries_by_name.insert(name.to_string(), entry);

        Ok(())
    }

    fn list(&self) -> Vec<(String, KeyEntry)> {
        self.order
            .iter()
            .filter_map(|name| {
                self.entries_by_name
                    .get(name)
                    .map(|entry| (name.clone(), entry.clone()))
            })
            .collect()
    }
}

/// In-memory implementation of KeyStore
///
/// Both indices sit behind a single lock, so readers never observe the
/// forward map and the reverse index out of step.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    index: RwLock<KeyIndex>,
}

impl InMemoryKeyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with entries, in the order given
    pub fn with_entries(entries: Vec<(String, KeyEntry)>) -> Result<Self, DomainError> {
        let mut index = KeyIndex::default();
        for (name, entry) in entries {
            index.put(&name, entry)?;
        }

        Ok(Self {
            index: RwLock::new(index),
        })
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn find_by_secret(
        &self,
        secret: &str,
    ) -> Result<Option<(String, KeyEntry)>, DomainError> {
        let index = self.index.read().await;
        Ok(index
            .find_by_secret(secret)
            .map(|(name, entry)| (name.clone(), entry.clone())))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<KeyEntry>, DomainError> {
        let index = self.index.read().await;
        Ok(index.entries_by_name.get(name).cloned())
    }

    async fn create_or_replace(
        &self,
        name: &str,
        secret: &str,
        description: Option<String>,
    ) -> Result<KeyEntry, DomainError> {
        let entry = KeyEntry::new(secret).with_optional_description(description);

        let mut index = self.index.write().await;
        index.put(name, entry.clone())?;

        Ok(entry)
    }

    async fn insert_entry(&self, name: &str, entry: KeyEntry) -> Result<(), DomainError> {
        let mut index = self.index.write().await;
        index.put(name, entry)
    }

    async fn create_or_replace_batch(
        &self,
        entries: Vec<(String, KeyEntry)>,
    ) -> Result<(), DomainError> {
        let mut index = self.index.write().await;

        // Applied to a copy so a rejected entry leaves the live index untouched
        let mut staged = index.clone();
        for (name, entry) in entries {
            staged.put(&name, entry)?;
        }

        *index = staged;
        Ok(())
    }

    async fn grant_model(&self, name: &str, model: &str) -> Result<bool, DomainError> {
        let mut index = self.index.write().await;

        // An unknown name is a no-op regardless of the model given
        let Some(entry) = index.entries_by_name.get_mut(name) else {
            return Ok(false);
        };
        validate_model(model)?;

        Ok(entry.grant_model(model))
    }

    async fn set_active(&self, name: &str, active: bool) -> Result<(), DomainError> {
        let mut index = self.index.write().await;
        if let Some(entry) = index.entries_by_name.get_mut(name) {
            entry.set_active(active);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<(String, KeyEntry)>, DomainError> {
        let index = self.index.read().await;
        Ok(index.list())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let index = self.index.read().await;
        Ok(index.entries_by_name.len())
    }
}

impl InMemoryKeyStore {
    /// Checks the reverse index against the forward map
    #[cfg(test)]
    async fn assert_consistent(&self) {
        let index = self.index.read().await;

        let expected: HashMap<String, String> = index
            .entries_by_name
            .iter()
            .map(|(name, e)| (e.secret().to_string(), name.clone()))
            .collect();
        assert_eq!(index.secret_to_name, expected);
        assert_eq!(index.order.len(), index.entries_by_name.len());
    }
}
