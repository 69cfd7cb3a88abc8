use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the service runtime.
///
/// Everything here is fatal; per-cycle failures are logged by the loop and
/// never reach this type.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] diskmirror_core::ConfigError),

    #[error("remote folder check failed for {folder}: {source}")]
    FolderCheck {
        folder: String,
        #[source]
        source: diskmirror_remote::RemoteError,
    },

    #[error("sync error: {0}")]
    Sync(#[from] diskmirror_sync::SyncError),

    #[error("runtime error: {0}")]
    Runtime(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
