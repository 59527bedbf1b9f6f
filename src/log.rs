// Logging setup: tracing events to stderr and, optionally, to a log file

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the configured filter
pub const LOG_ENV: &str = "DOCSTRING2MD_LOG";

pub const DEFAULT_LEVEL: &str = "warn";

/// Level selected by the `--debug` / `--quiet` flags, `None` when neither is set
pub fn level_from_flags(debug: bool, quiet: bool) -> Option<&'static str> {
    match (debug, quiet) {
        (true, _) => Some("debug"),
        (false, true) => Some("error"),
        (false, false) => None,
    }
}

/// Filter from `DOCSTRING2MD_LOG` if set, else from `level`
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber.
///
/// The log file is opened in append mode and receives plain text. Calling
/// this again after a subscriber is installed has no effect.
pub fn init(level: &str, logfile: Option<&Path>) -> Result<()> {
    let file_layer = match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::CannotCreate {
                    path: path.to_path_buf(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let installed = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok();
    if installed {
        if let Some(path) = logfile {
            tracing::info!("log file used: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(level_from_flags(true, false), Some("debug"));
        assert_eq!(level_from_flags(false, true), Some("error"));
        assert_eq!(level_from_flags(false, false), None);
    }

    #[test]
    fn test_build_filter_accepts_levels() {
        for level in ["debug", "WARN", "error"] {
            let filter = build_filter(level);
            assert!(!filter.to_string().is_empty());
        }
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let logfile = dir.path().join("run.log");
        assert!(init("info", Some(&logfile)).is_ok());
        assert!(init("debug", None).is_ok());
        assert!(logfile.exists());
    }

    #[test]
    fn test_init_with_unwritable_logfile() {
        let dir = TempDir::new().unwrap();
        let logfile = dir.path().join("missing").join("run.log");
        let err = init("info", Some(&logfile)).unwrap_err();
        assert!(matches!(err, Error::CannotCreate { .. }));
    }
}
