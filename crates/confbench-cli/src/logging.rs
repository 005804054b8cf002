use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps `-v`/`-q` to the maximum level shown.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: a compact stderr layer and, if requested, a plain-text
/// file layer.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = level_filter(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(level)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, error, info, trace, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(2, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn initialization_and_macros_work() {
        ensure_global_logger_is_set();

        error!("This is an error");
        warn!(molecule = 42, "This is a warning");
        info!("This is info");
        debug!("This is debug");
        trace!("This is trace");
    }

    #[test]
    #[serial]
    fn file_layer_writes_plain_text_with_thread_ids() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("test.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            warn!(molecule = 7, "Skipping molecule.");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Skipping molecule."));
        assert!(content.contains("molecule=7"));
        assert!(content.contains("WARN"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
