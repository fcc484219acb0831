//! Logging initialization
//!
//! Sets up the global tracing subscriber from [`LoggingConfig`]. The
//! `RUST_LOG` environment variable, when set, overrides the configured
//! level.

use tracing_subscriber::EnvFilter;

use campushub_core::config::LoggingConfig;

/// Initializes the global tracing subscriber
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    if config.json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    }
}
