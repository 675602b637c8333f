//! Logging initialization.
//!
//! Installs a `tracing` subscriber with an `EnvFilter` (from `RUST_LOG`, falling back to the
//! configured filter) and a plain or JSON fmt layer writing to stderr, so stdout stays free for
//! command output.

use crate::config::LoggingConfig;
use loopstudio_error::{Result, StudioError};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.filter)?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| StudioError::debug(format!("Failed to install log subscriber: {}", e)))
}

fn build_filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback)
        .map_err(|e| StudioError::config(format!("Invalid log filter '{}': {}", fallback, e)))
}
