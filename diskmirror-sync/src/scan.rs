//! Local folder scanner.
//!
//! Produces a name → entry map of the regular files directly inside one
//! folder. Subdirectories are not descended into.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};

use diskmirror_core::types::{FileName, LocalFileEntry, LocalFiles};

use crate::error::{scan_err, SyncError};

/// Scan `dir` for regular files.
///
/// Symlinks are followed: a link to a regular file counts as a file, a
/// dangling link is skipped. Entries that vanish or cannot be stat'ed while
/// the scan runs are skipped; only failing to read `dir` itself is an error.
pub fn scan_local(dir: &Path) -> Result<LocalFiles, SyncError> {
    let entries = fs::read_dir(dir).map_err(|e| scan_err(dir, e))?;

    let mut files = LocalFiles::new();
    for entry in entries {
        let entry = entry.map_err(|e| scan_err(dir, e))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(file = %name, "entry vanished during scan");
                continue;
            }
            Err(err) => {
                tracing::warn!(file = %name, error = %err, "cannot stat entry, skipping");
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }

        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| DateTime::<Utc>::from(UNIX_EPOCH));
        let name = FileName::from(name);
        files.insert(name.clone(), LocalFileEntry { name, modified });
    }

    tracing::debug!(folder = %dir.display(), count = files.len(), "scanned local folder");
    Ok(files)
}
