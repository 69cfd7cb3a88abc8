//! The [`RemoteStore`] capability consumed by the sync cycle.

use std::path::Path;

use diskmirror_core::types::{FileName, RemoteFileEntry};

use crate::error::RemoteError;

/// A remote folder that can be listed, written to and pruned.
///
/// Implementations are bound to one folder and one credential for their
/// whole lifetime. Every call is blocking and must be bounded by network
/// timeouts; a timeout surfaces as an `Err` like any other failure.
pub trait RemoteStore: Send + Sync {
    /// The bound folder, as addressed by the remote API.
    fn folder(&self) -> &str;

    /// Create the bound folder if it does not exist. Idempotent.
    fn ensure_folder(&self) -> Result<(), RemoteError>;

    /// Immediate children of the bound folder. An empty folder is `Ok(vec![])`.
    fn list(&self) -> Result<Vec<RemoteFileEntry>, RemoteError>;

    /// Upload `local_path` under its base name. With `overwrite`, an existing
    /// object of the same name is replaced unconditionally.
    fn upload(&self, local_path: &Path, overwrite: bool) -> Result<(), RemoteError>;

    /// Remove a child of the bound folder. Without `permanently` the object
    /// goes to the remote trash.
    fn delete(&self, name: &FileName, permanently: bool) -> Result<(), RemoteError>;
}

/// Base name of `local_path` as a [`FileName`], rejecting paths without a
/// UTF-8 final component.
pub fn upload_name(local_path: &Path) -> Result<FileName, RemoteError> {
    local_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(FileName::from)
        .ok_or_else(|| RemoteError::InvalidPath(local_path.display().to_string()))
}
