use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` takes precedence over the configured level.
///
/// Output goes to stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    match result {
        Ok(()) => tracing::debug!("Logging initialized with level: {}", config.level),
        Err(e) => eprintln!("Logging already initialized: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let json = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
        };
        let pretty = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        };

        // Only the first call installs a subscriber; the second reports and returns
        init_logging(&json);
        init_logging(&pretty);
        tracing::info!("still logging");
    }
}
