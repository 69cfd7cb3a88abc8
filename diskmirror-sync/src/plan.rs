//! Reconciler: decide which uploads and deletions make the remote folder
//! match the local one.
//!
//! Presence by name is the only criterion. Every local file is uploaded on
//! every cycle (uploads overwrite), and every remote name missing locally is
//! deleted.

use std::collections::HashSet;

use serde::Serialize;

use diskmirror_core::types::{FileName, LocalFileEntry, LocalFiles, RemoteFileEntry};

/// Operations for one cycle. Built fresh each time and dropped after use.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SyncPlan {
    /// Every local file, in name order.
    pub to_upload: Vec<LocalFileEntry>,
    /// Remote entries without a local counterpart, in listing order.
    pub to_delete: Vec<RemoteFileEntry>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_upload.is_empty() && self.to_delete.is_empty()
    }

    pub fn upload_names(&self) -> Vec<&FileName> {
        self.to_upload.iter().map(|e| &e.name).collect()
    }

    pub fn delete_names(&self) -> Vec<&FileName> {
        self.to_delete.iter().map(|e| &e.name).collect()
    }
}

/// Compute the plan for `local` against `remote`.
///
/// Pure and deterministic. A name listed twice remotely is deleted once.
pub fn plan(local: &LocalFiles, remote: &[RemoteFileEntry]) -> SyncPlan {
    let to_upload = local.values().cloned().collect();

    let mut seen = HashSet::new();
    let to_delete = remote
        .iter()
        .filter(|entry| !local.contains_key(&entry.name))
        .filter(|entry| seen.insert(entry.name.clone()))
        .cloned()
        .collect();

    SyncPlan {
        to_upload,
        to_delete,
    }
}
