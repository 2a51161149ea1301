// Logging module for structured logging using the tracing crate

use std::error::Error;
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber with default settings
///
/// Equivalent to [`init_with_config`] with `LoggingConfig::default()`:
/// JSON output to stdout, `info` level unless `RUST_LOG` says otherwise.
///
/// # Examples
///
/// ```
/// use utsushi::logging::init_subscriber;
///
/// init_subscriber().expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber() -> Result<(), Box<dyn Error>> {
    init_with_config(&LoggingConfig::default())
}

/// Initialize the tracing subscriber from configuration
///
/// `RUST_LOG` takes precedence over `config.level`. Only the first call
/// installs a subscriber; later calls are no-ops and return `Ok`.
pub fn init_with_config(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    // A subscriber installed elsewhere (e.g. by a test harness) is not an error.
    if let Err(e) = result {
        tracing::debug!(error = %e, "Global tracing subscriber already set");
    }

    let _ = INIT.set(());
    Ok(())
}
