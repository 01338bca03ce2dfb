//! End-to-end behaviour of the key manager over the in-memory store

use std::sync::Arc;

use key_registry::{
    AccessDecision, DomainError, InMemoryKeyStore, KeyEntry, KeyManager, KeyStore, ALL_MODELS,
    PLACEHOLDER_KEY,
};

fn manager() -> (Arc<InMemoryKeyStore>, KeyManager) {
    let store = Arc::new(InMemoryKeyStore::new());
    let manager = KeyManager::new(store.clone());
    (store, manager)
}

#[tokio::test]
async fn seeded_key_grant_and_deactivate() {
    let (store, manager) = manager();
    manager
        .seed(vec![("svc-a".to_string(), KeyEntry::new("sk_a"))])
        .await
        .unwrap();

    assert!(manager.grant_model("svc-a", "gpt-x").await.unwrap());
    assert!(!manager.grant_model("svc-a", "gpt-x").await.unwrap());
    assert_eq!(manager.allowed_models_for("sk_a").await.unwrap(), ["gpt-x"]);

    manager.set_active("svc-a", false).await.unwrap();

    let entry = store.get_by_secret("sk_a").await.unwrap().unwrap();
    assert!(!entry.is_active());
    assert_eq!(entry.allowed_models(), ["gpt-x"]);
}

#[tokio::test]
async fn reissue_invalidates_previous_secret() {
    let (store, manager) = manager();

    let s1 = manager.issue_key("svc-b").await.unwrap();
    let s2 = manager.issue_key("svc-b").await.unwrap();

    assert_ne!(s1, s2);
    assert!(store.get_by_secret(&s1).await.unwrap().is_none());
    assert_eq!(store.get_by_secret(&s2).await.unwrap().unwrap().secret(), s2);
    assert_eq!(
        manager.check_access(&s1, "gpt-x").await.unwrap(),
        AccessDecision::UnknownKey
    );
}

#[tokio::test]
async fn created_secrets_resolve_to_their_entries() {
    let (store, manager) = manager();

    let mut issued = Vec::new();
    for name in ["a", "b", "c"] {
        issued.push(manager.issue_key(name).await.unwrap());
    }

    for secret in &issued {
        let entry = store.get_by_secret(secret).await.unwrap().unwrap();
        assert_eq!(entry.secret(), secret);
    }

    let names: Vec<String> = manager
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn unknown_lookups_fall_back_to_safe_defaults() {
    let (_, manager) = manager();

    assert!(manager.allowed_models_for("sk_unknown").await.unwrap().is_empty());
    assert!(!manager.grant_model("nobody", "gpt-x").await.unwrap());
    assert_eq!(manager.current_key_for("nobody").await.unwrap(), PLACEHOLDER_KEY);
    manager.set_active("nobody", false).await.unwrap();
    assert!(manager.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn placeholder_cannot_be_registered_as_a_secret() {
    let (store, manager) = manager();

    let err = store
        .insert_entry("legacy", KeyEntry::new(PLACEHOLDER_KEY).with_models([ALL_MODELS]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let fallback = manager.current_key_for("nobody").await.unwrap();
    assert_eq!(
        manager.check_access(&fallback, "gpt-x").await.unwrap(),
        AccessDecision::UnknownKey
    );
}
