use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use dashboard_core::settings::Settings;
use dashboard_data::reader::DataLoader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.bike-dashboard/` exists for persisted settings.
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(home.join(".bike-dashboard"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log-level name to a `tracing` filter directive.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so that report output on stdout stays clean. When
/// `log_file` is given, events are also appended to that file without ANSI
/// colouring.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Build the dataset loader: `--data-dir` (or its persisted value) first,
/// then the default candidate directories.
pub fn data_loader(settings: &Settings) -> DataLoader {
    match &settings.data_dir {
        Some(dir) => DataLoader::with_preferred_dir(dir.clone()),
        None => DataLoader::default(),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_filter_directive_mapping() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("INFO"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("trace"), "trace");
    }

    #[test]
    fn test_data_loader_defaults() {
        let settings = Settings::parse_from(["bike-dashboard"]);
        let loader = data_loader(&settings);
        assert_eq!(
            loader.dirs(),
            &[
                PathBuf::from("submission/data/archive"),
                PathBuf::from("data/archive")
            ]
        );
    }

    #[test]
    fn test_data_loader_prefers_data_dir() {
        let settings = Settings::parse_from(["bike-dashboard", "--data-dir", "/srv/bikes"]);
        let loader = data_loader(&settings);
        assert_eq!(loader.dirs()[0], PathBuf::from("/srv/bikes"));
        assert_eq!(loader.dirs().len(), 3);
    }

    #[test]
    fn test_ensure_directories() {
        let tmp = tempfile::TempDir::new().expect("tempdir");

        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");
        assert!(tmp.path().join(".bike-dashboard").is_dir());
    }
}
