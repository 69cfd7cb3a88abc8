//! Console + file logging.
//!
//! Every event goes to stderr (text) and to the configured log file (text or
//! JSON, no ANSI colors). Stdout stays free for command output. `RUST_LOG` overrides the default `info` filter.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use diskmirror_core::{LogFormat, SyncConfig};

use crate::error::{io_err, DaemonError};

/// Install the process-wide subscriber. Call once, before anything logs.
///
/// A second call is a no-op: the first subscriber stays installed.
pub fn init(config: &SyncConfig) -> Result<(), DaemonError> {
    let _ = subscriber(&config.log_file, config.log_format)?.try_init();
    Ok(())
}

/// Build the console + file subscriber without installing it.
pub fn subscriber(
    log_file: &Path,
    format: LogFormat,
) -> Result<impl Subscriber + Send + Sync + 'static, DaemonError> {
    let file = open_log_file(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (text_file, json_file) = match format {
        LogFormat::Text => (
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_target(false),
            ),
        ),
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(text_file)
        .with(json_file))
}

/// Open `path` for appending, creating it and its parent directory if needed.
fn open_log_file(path: &Path) -> Result<File, DaemonError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_err(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn text_log_lines_reach_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let log = dir.path().join("logs").join("diskmirror.log");

        let sub = subscriber(&log, LogFormat::Text).expect("subscriber");
        tracing::subscriber::with_default(sub, || {
            tracing::info!(file = "a.txt", "file uploaded");
        });

        let contents = fs::read_to_string(&log).expect("read log");
        assert!(contents.contains("file uploaded"), "got: {contents}");
        assert!(contents.contains("a.txt"));
        assert!(contents.contains("INFO"));
        assert!(!contents.contains("\u{1b}["), "file log must not contain ANSI codes");
    }

    #[test]
    fn json_log_lines_are_json_objects() {
        let dir = TempDir::new().expect("tempdir");
        let log = dir.path().join("diskmirror.log");

        let sub = subscriber(&log, LogFormat::Json).expect("subscriber");
        tracing::subscriber::with_default(sub, || {
            tracing::warn!(file = "b.txt", "delete failed");
        });

        let contents = fs::read_to_string(&log).expect("read log");
        let line = contents.lines().next().expect("one line");
        let value: serde_json::Value = serde_json::from_str(line).expect("json line");
        assert_eq!(value["fields"]["message"], "delete failed");
        assert_eq!(value["fields"]["file"], "b.txt");
    }

    #[test]
    fn existing_log_is_appended_not_truncated() {
        let dir = TempDir::new().expect("tempdir");
        let log = dir.path().join("diskmirror.log");
        fs::write(&log, "previous run\n").expect("seed");

        let sub = subscriber(&log, LogFormat::Text).expect("subscriber");
        tracing::subscriber::with_default(sub, || tracing::info!("second run"));

        let contents = fs::read_to_string(&log).expect("read log");
        assert!(contents.starts_with("previous run\n"));
        assert!(contents.contains("second run"));
    }

    #[test]
    fn unwritable_log_path_is_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").expect("write");

        let err = subscriber(&blocker.join("diskmirror.log"), LogFormat::Text)
            .err()
            .expect("must fail");
        assert!(matches!(err, DaemonError::Io { .. }), "got: {err}");
    }
}
