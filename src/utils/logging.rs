//! Structured logging setup.
//!
//! The library itself only emits `tracing` events. Applications that want
//! them printed call [`init_logging`] once at startup. `RUST_LOG`, when set,
//! takes precedence over the configured level.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;
use crate::error::{constants, Result, SocketError};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install a global subscriber according to `config`.
///
/// Fails if a global subscriber is already installed or the log file cannot
/// be opened.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.log_to_console {
        let console = fmt::layer().with_target(true);
        layers.push(if config.json_format {
            console.json().boxed()
        } else {
            console.boxed()
        });
    }

    if config.log_to_file {
        let path = config.log_file_path.as_deref().ok_or_else(|| {
            SocketError::ConfigError(constants::ERR_LOG_FILE_MISSING.to_string())
        })?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                SocketError::ConfigError(format!("{} '{path}': {e}", constants::ERR_LOG_FILE_OPEN))
            })?;

        let writer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
        layers.push(if config.json_format {
            writer.json().boxed()
        } else {
            writer.boxed()
        });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| SocketError::ConfigError(format!("{}: {e}", constants::ERR_LOG_INIT)))?;

    tracing::info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
