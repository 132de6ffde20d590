//! # Structured Logging Module
//!
//! Environment-aware structured logging that writes human-readable output to
//! the console and JSON lines to a per-process log file, for tracing async
//! message flows across the server and worker processes.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// Safe to call more than once; only the first call installs the subscriber.
/// `RUST_LOG` overrides the environment-derived default level.
pub fn init_structured_logging(service: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let log_dir = PathBuf::from("log");
        if !log_dir.exists() && fs::create_dir_all(&log_dir).is_err() {
            // Fall back to console-only logging when the directory is unwritable
            let subscriber = tracing_subscriber::registry().with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true)
                    .with_filter(env_filter(&log_level)),
            );
            let _ = subscriber.try_init();
            return;
        }

        let pid = process::id();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("{service}.{environment}.{pid}.{timestamp}.log");
        let log_path = log_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true)
                    .with_filter(env_filter(&log_level)),
            )
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(env_filter(&log_level)),
            );

        // try_init so tests that already installed a subscriber keep working
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = pid,
            environment = %environment,
            log_file = %log_path.display(),
            "🔧 STRUCTURED LOGGING: Initialized with file output"
        );

        // The non-blocking writer stops flushing once its guard drops; the
        // subscriber lives for the whole process, so must the guard.
        std::mem::forget(guard);
    });
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("TASKHELM_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get default log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_environment_defaults_to_development() {
        if std::env::var("TASKHELM_ENV").is_err() && std::env::var("APP_ENV").is_err() {
            assert_eq!(get_environment(), "development");
        }
    }

    #[test]
    fn test_file_layer_writes_into_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let appender = tracing_appender::rolling::never(dir.path(), "probe.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        use std::io::Write;
        let mut writer = writer;
        writer.write_all(b"probe\n").expect("write");
        drop(guard);

        let contents = fs::read_to_string(dir.path().join("probe.log")).expect("read back");
        assert!(contents.contains("probe"));
    }
}
