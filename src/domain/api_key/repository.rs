//! Key store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::KeyEntry;
use crate::domain::DomainError;

/// Storage contract for API key entries
///
/// Entries are indexed both by the identity name they are registered under and
/// by their secret. Implementations own both indices and keep them consistent:
/// after every mutation, looking up any stored secret yields the entry that
/// currently holds it, and no replaced secret remains reachable.
///
/// Unknown names and secrets are reported as `Ok(None)` / `Ok(false)`; `Err`
/// is reserved for invalid input, secret conflicts and backend failures.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Get the name and entry holding the secret presented by a caller
    async fn find_by_secret(
        &self,
        secret: &str,
    ) -> Result<Option<(String, KeyEntry)>, DomainError>;

    /// Get an entry by the secret presented by a caller
    async fn get_by_secret(&self, secret: &str) -> Result<Option<KeyEntry>, DomainError> {
        Ok(self.find_by_secret(secret).await?.map(|(_, entry)| entry))
    }

    /// Get an entry by the name it is registered under
    async fn get_by_name(&self, name: &str) -> Result<Option<KeyEntry>, DomainError>;

    /// Register a fresh active entry with no model grants under `name`
    ///
    /// Replaces any entry already registered under `name`; its previous
    /// secret stops resolving. Fails with `Validation` for malformed input,
    /// including the reserved placeholder secret.
    async fn create_or_replace(
        &self,
        name: &str,
        secret: &str,
        description: Option<String>,
    ) -> Result<KeyEntry, DomainError>;

    /// Register a complete entry under `name`, replacing any existing one
    async fn insert_entry(&self, name: &str, entry: KeyEntry) -> Result<(), DomainError>;

    /// Register many entries at once, in the order given
    ///
    /// Either every entry is applied or, on error, none is.
    async fn create_or_replace_batch(
        &self,
        entries: Vec<(String, KeyEntry)>,
    ) -> Result<(), DomainError>;

    /// Add a model to an entry's grants
    ///
    /// Returns true if the model was newly added; false if it was already
    /// granted or no entry is registered under `name`. An unknown name is
    /// checked before the model, so it yields false even for a malformed model.
    async fn grant_model(&self, name: &str, model: &str) -> Result<bool, DomainError>;

    /// Set the active flag; does nothing for an unknown name
    async fn set_active(&self, name: &str, active: bool) -> Result<(), DomainError>;

    /// Snapshot of all entries in registration order
    async fn list_all(&self) -> Result<Vec<(String, KeyEntry)>, DomainError>;

    /// Number of registered entries
    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.list_all().await?.len())
    }

    /// Whether the store holds no entries
    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}
