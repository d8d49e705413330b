//! Subscriber setup

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured filter. Logs go to stderr so
/// command output stays clean.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let (json, plain) = if config.json_logs {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stderr)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
        .map_err(|e| ConsoleError::Logging(e.to_string()))
}
