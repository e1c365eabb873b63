//! File logging. The terminal belongs to the UI, so events go to `log_path`.

use crate::config::TuiConfig;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Failed to init subscriber: {0}")]
    Install(String),
}

/// `RUST_LOG` when set and valid, otherwise `fallback`.
pub fn build_filter(fallback: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(fallback)?),
    }
}

pub fn init(config: &TuiConfig) -> Result<(), LoggingError> {
    let open_error = |source| LoggingError::Open {
        path: config.log_path.clone(),
        source,
    };
    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(open_error)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .map_err(open_error)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.log_filter)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        log_path = %config.log_path.display(),
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_directive_is_accepted() {
        assert!(build_filter("quotewatch_tui=debug,warn").is_ok());
    }

    #[test]
    fn open_error_names_the_path() {
        let err = LoggingError::Open {
            path: PathBuf::from("/nope/tui.log"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("Failed to open log file /nope/tui.log"));
    }
}
