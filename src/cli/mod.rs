//! CLI module for the key registry
//!
//! Every invocation loads configuration, seeds an in-memory store from it and
//! runs one command against that store:
//! - `list`: show registered keys
//! - `check`: decide whether a secret may use a model
//! - `issue`: issue a fresh key for a name
//! - `current`: show the secret registered under a name

pub mod keys;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::api_key::{InMemoryKeyStore, KeyManager};
use crate::infrastructure::logging;

/// Key registry - API keys, their identities and model permissions
#[derive(Parser)]
#[command(name = "key-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to config/default and config/local
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered keys with masked secrets
    List,

    /// Check whether a secret may use a model
    Check {
        #[arg(long)]
        secret: String,
        #[arg(long)]
        model: String,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Issue a new key for a name, rotating any existing one
    Issue {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Print the secret registered under a name
    Current {
        #[arg(long)]
        name: String,
    },
}

/// Load configuration, initialise logging and build a seeded key manager
pub async fn bootstrap(config_path: Option<&PathBuf>) -> anyhow::Result<KeyManager> {
    dotenvy::dotenv().ok();

    let config = match config_path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };

    logging::init_logging(&config.logging);

    build_manager(&config).await
}

/// Build a key manager over a fresh in-memory store seeded from `config`
pub async fn build_manager(config: &AppConfig) -> anyhow::Result<KeyManager> {
    let generator = config
        .keys
        .generator()
        .context("Invalid key generation settings")?;
    let manager = KeyManager::new(Arc::new(InMemoryKeyStore::new()))
        .with_generator(Arc::new(generator));

    manager
        .seed(config.seed_entries()?)
        .await
        .context("Failed to seed API keys from configuration")?;

    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from([
            "key-registry",
            "check",
            "--secret",
            "sk_a",
            "--model",
            "gpt-x",
        ]);

        match cli.command {
            Command::Check {
                secret,
                model,
                json,
            } => {
                assert_eq!(secret, "sk_a");
                assert_eq!(model, "gpt-x");
                assert!(!json);
            }
            _ => panic!("expected check command"),
        }
    }

    #[tokio::test]
    async fn test_build_manager_seeds_store() {
        let config = AppConfig::from_toml(
            r#"
            [[seed]]
            name = "svc-a"
            secret = "sk_a"
            allowed_models = ["gpt-x"]
            "#,
        )
        .unwrap();

        let manager = build_manager(&config).await.unwrap();

        assert_eq!(manager.allowed_models_for("sk_a").await.unwrap(), ["gpt-x"]);
    }

    #[tokio::test]
    async fn test_build_manager_rejects_invalid_settings() {
        let oversized = AppConfig::from_toml("[keys]\nkey_bytes = 4096\n").unwrap();
        assert!(build_manager(&oversized).await.is_err());

        let placeholder_seed = AppConfig::from_toml(
            r#"
            [[seed]]
            name = "legacy"
            secret = "BASE_API_KEY"
            allowed_models = ["*"]
            "#,
        )
        .unwrap();
        assert!(build_manager(&placeholder_seed).await.is_err());
    }
}
