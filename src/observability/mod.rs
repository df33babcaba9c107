//! Observability and structured logging infrastructure.
//!
//! # Environment Configuration
//!
//! ```bash
//! # Set log level for all modules
//! RUST_LOG=debug cargo run
//!
//! # Component-specific levels
//! RUST_LOG=coin_users_api=debug,sqlx=warn cargo run
//!
//! # Enable JSON output for production
//! LOG_JSON=true cargo run
//!
//! # Write logs to file with daily rotation
//! LOG_FILE=./logs/api.log cargo run
//! ```
//!
//! `LOG_JSON` and `LOG_FILE` may also be set in `.env`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "coin_users_api=info,tower_http=info,warn";

/// Log output settings read from `LOG_FILE` and `LOG_JSON`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// Daily-rotated JSON log file, if any
    pub file: Option<PathBuf>,
    /// JSON console output instead of the pretty format
    pub json: bool,
}

impl LogSettings {
    /// Reads the settings from the process environment, after loading `.env`.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings from an arbitrary variable lookup.
    ///
    /// An empty `LOG_FILE` disables file output; a `LOG_JSON` that is not a
    /// boolean counts as `false`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = lookup("LOG_FILE")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let json = lookup("LOG_JSON")
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(false);

        Self { file, json }
    }
}

/// Initialize the tracing subscriber.
///
/// * `log_level` - Filter used when `RUST_LOG` is unset.
/// * `log_file` - Optional file path; enables daily-rotated JSON file output.
/// * `json_output` - JSON console output instead of the pretty format.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_tracing(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    json_output: bool,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = if let Ok(filter) = std::env::var("RUST_LOG") {
        EnvFilter::new(filter)
    } else if let Some(level) = log_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(DEFAULT_FILTER)
    };

    let console_layer = if json_output {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let (file_layer, guard) = match log_file.as_deref() {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;

            let appender = tracing_appender::rolling::daily(
                dir,
                path.file_name().unwrap_or_else(|| OsStr::new("api.log")),
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_current_span(true)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(
        json_output,
        file_logging = log_file.is_some(),
        "Tracing initialized"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> LogSettings {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        LogSettings::from_lookup(|key| vars.get(key).map(ToString::to_string))
    }

    #[test]
    fn test_log_settings_defaults() {
        assert_eq!(settings_from(&[]), LogSettings::default());
        assert_eq!(settings_from(&[("LOG_FILE", "")]).file, None);
        assert!(!settings_from(&[("LOG_JSON", "yes")]).json);
    }

    #[test]
    fn test_log_settings_values() {
        let settings = settings_from(&[("LOG_FILE", "./logs/api.log"), ("LOG_JSON", "true")]);
        assert_eq!(settings.file, Some(PathBuf::from("./logs/api.log")));
        assert!(settings.json);
    }

    #[test]
    fn test_init_tracing_twice_reports_error() {
        // Only one global subscriber per process; the second call must fail
        // cleanly instead of panicking.
        let first = init_tracing(Some("debug".to_string()), None, false);
        let second = init_tracing(None, None, true);
        assert!(first.is_err() || second.is_err());
    }

    #[test]
    fn test_init_tracing_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested").join("api.log");

        // May fail to install if another test got there first, but the
        // directory is created before installation is attempted.
        let _ = init_tracing(None, Some(log_path), false);

        assert!(dir.path().join("nested").is_dir());
    }
}
