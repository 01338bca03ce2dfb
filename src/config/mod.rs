//! Application configuration

mod app_config;

pub use app_config::{AppConfig, KeyGenerationConfig, LogFormat, LoggingConfig, SeedKey};
