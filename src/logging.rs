//! Log subscriber setup
//!
//! All log output goes to stderr so stdout stays reserved for the accounts CSV.

use crate::cli::LogFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_ansi(false);
            registry.with(layer).try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()
        }
    };

    result.map_err(|e| format!("Failed to initialise logging: {}", e))
}
