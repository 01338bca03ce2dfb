use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{DomainError, KeyEntry};
use crate::infrastructure::api_key::ApiKeyGenerator;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub keys: KeyGenerationConfig,
    /// Keys registered at startup, in order
    pub seed: Vec<SeedKey>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for newly issued secrets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyGenerationConfig {
    pub prefix: String,
    pub key_bytes: usize,
}

/// A key loaded from configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeedKey {
    pub name: String,
    pub secret: String,
    #[serde(default)]
    pub allowed_models: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for KeyGenerationConfig {
    fn default() -> Self {
        Self {
            prefix: ApiKeyGenerator::DEFAULT_PREFIX.to_string(),
            key_bytes: ApiKeyGenerator::DEFAULT_KEY_BYTES,
        }
    }
}

impl KeyGenerationConfig {
    /// Build the generator, rejecting settings whose secrets could never be stored
    pub fn generator(&self) -> Result<ApiKeyGenerator, DomainError> {
        if let Some(c) = self
            .prefix
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(DomainError::configuration(format!(
                "keys.prefix contains invalid character: {:?}",
                c
            )));
        }

        let max = ApiKeyGenerator::max_key_bytes(&self.prefix);
        if !(ApiKeyGenerator::MIN_KEY_BYTES..=max).contains(&self.key_bytes) {
            return Err(DomainError::configuration(format!(
                "keys.key_bytes must be between {} and {} for prefix '{}', got {}",
                ApiKeyGenerator::MIN_KEY_BYTES,
                max,
                self.prefix,
                self.key_bytes
            )));
        }

        Ok(ApiKeyGenerator::new(&self.prefix).with_key_bytes(self.key_bytes))
    }
}

impl SeedKey {
    pub fn into_entry(self) -> (String, KeyEntry) {
        let entry = KeyEntry::new(self.secret)
            .with_models(self.allowed_models)
            .with_active(self.active)
            .with_optional_description(self.description);

        (self.name, entry)
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Load from an explicit file, still allowing environment overrides
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Parse a TOML document without consulting the environment
    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }

    /// Seed entries in declaration order, rejecting names declared twice
    pub fn seed_entries(&self) -> Result<Vec<(String, KeyEntry)>, DomainError> {
        let mut seen = HashSet::new();

        self.seed
            .iter()
            .map(|key| {
                if !seen.insert(key.name.as_str()) {
                    return Err(DomainError::configuration(format!(
                        "API key '{}' is declared more than once",
                        key.name
                    )));
                }
                Ok(key.clone().into_entry())
            })
            .collect()
    }
}
