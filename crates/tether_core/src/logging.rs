//! Logging bootstrap

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::BridgeConfig;

/// Install a global fmt subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. Returns `false`
/// if a global subscriber was already installed, which is not an error.
pub fn init(config: &BridgeConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .is_ok()
}
