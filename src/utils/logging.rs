//! Logging setup for the ivkit binary.
//!
//! Library code emits `tracing` events; the binary installs one global
//! subscriber writing to stderr so report tables on stdout stay clean.

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "warn";

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
pub fn init_logging() -> anyhow::Result<()> {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    Registry::default()
        .with(build_env_filter())
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
