//! Operational helpers: logging setup.

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use fourthdown_types::{config::OpsConfig, FourthDownError, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub fn build_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| FourthDownError::Ops(format!("failed to create log filter: {err}")))
}

/// Install the global subscriber. Logs go to `log_file` when configured,
/// otherwise to stderr.
pub fn init_tracing(config: &OpsConfig) -> Result<()> {
    let filter = build_filter(&config.log_level)?;

    match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(Path::new(path))
                .map_err(|err| {
                    FourthDownError::Ops(format!("failed to open log file {path}: {err}"))
                })?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| FourthDownError::Ops(format!("tracing init error: {err}")))?;
            info!("Logging to {path}");
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| FourthDownError::Ops(format!("tracing init error: {err}")))?;
        }
    }
    Ok(())
}
