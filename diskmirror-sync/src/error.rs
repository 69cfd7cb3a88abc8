//! Error types for diskmirror-sync.

use std::path::PathBuf;

use thiserror::Error;

use diskmirror_remote::RemoteError;

/// Errors that end a cycle before any file operation runs.
///
/// Per-file upload/delete failures are not errors at this level; they are
/// reported as [`crate::OperationOutcome::Failed`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local folder could not be read (missing, permission denied).
    #[error("cannot scan local folder {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote listing failed.
    #[error("remote listing failed: {0}")]
    Remote(#[from] RemoteError),
}

/// Convenience constructor for [`SyncError::Scan`].
pub(crate) fn scan_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Scan {
        path: path.into(),
        source,
    }
}
