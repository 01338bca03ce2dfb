//! API Key entry and related types

use serde::{Deserialize, Serialize};

/// Model identifier that grants access to every model
pub const ALL_MODELS: &str = "*";

/// Stands in for the secret of a name that has no key registered
///
/// Stores refuse it as a secret, so it never authorizes anything.
pub const PLACEHOLDER_KEY: &str = "BASE_API_KEY";

/// Number of secret characters kept visible when a secret is masked for display
const VISIBLE_SECRET_CHARS: usize = 6;

/// Metadata for one issued credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// The bearer-presented credential, unique within a store
    secret: String,
    /// Models this key may invoke, in grant order
    #[serde(default)]
    allowed_models: Vec<String>,
    /// Inactive keys must be treated as invalid by consumers
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

fn default_active() -> bool {
    true
}

impl KeyEntry {
    /// Create an active entry with no model grants
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            allowed_models: Vec::new(),
            active: true,
            description: None,
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the optional description
    pub fn with_optional_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set allowed models, dropping repeated identifiers
    pub fn with_models(mut self, models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_models = Vec::new();
        for model in models {
            self.grant_model(model);
        }
        self
    }

    /// Set active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    // Getters

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn allowed_models(&self) -> &[String] {
        &self.allowed_models
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Secret with everything past the first few characters hidden, for logs and listings
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.secret)
    }

    /// Whether `model` is covered by the grants, either directly or through [`ALL_MODELS`]
    ///
    /// This ignores `active`; callers combine both checks.
    pub fn allows_model(&self, model: &str) -> bool {
        self.allowed_models
            .iter()
            .any(|m| m == ALL_MODELS || m == model)
    }

    // Mutators

    /// Add a model if absent. Returns true when it was newly added.
    pub fn grant_model(&mut self, model: impl Into<String>) -> bool {
        let model = model.into();
        if self.allowed_models.contains(&model) {
            return false;
        }
        self.allowed_models.push(model);
        true
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Drop repeated model identifiers, keeping the first occurrence
    pub(crate) fn dedup_models(&mut self) {
        let models = std::mem::take(&mut self.allowed_models);
        for model in models {
            self.grant_model(model);
        }
    }
}

/// Hide all but the leading characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(VISIBLE_SECRET_CHARS).collect();
    if visible.len() == secret.len() {
        return "*".repeat(secret.chars().count().max(1));
    }
    format!("{}…", visible)
}

/// Outcome of checking a presented secret against a model
///
/// Unlike an empty model list, this keeps unknown keys apart from keys that
/// exist but lack the grant, so audit logs can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// No key with this secret exists
    UnknownKey,
    /// The key exists but has been deactivated
    Inactive { name: String },
    /// The key is active but has no grant for the model
    ModelNotAllowed { name: String },
    /// The key is active and may use the model
    Allowed { name: String },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Name of the key that was presented, if it is known
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Self::UnknownKey => None,
            Self::Inactive { name } | Self::ModelNotAllowed { name } | Self::Allowed { name } => {
                Some(name)
            }
        }
    }
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKey => write!(f, "denied: unknown key"),
            Self::Inactive { name } => write!(f, "denied: key '{}' is inactive", name),
            Self::ModelNotAllowed { name } => {
                write!(f, "denied: key '{}' is not allowed to use this model", name)
            }
            Self::Allowed { name } => write!(f, "allowed: key '{}'", name),
        }
    }
}
