//! One reconciliation cycle: scan → list → plan → execute.
//!
//! This is the shared entrypoint for `diskmirror once` and the daemon loop.

use std::path::Path;

use serde::Serialize;

use diskmirror_core::types::FileName;
use diskmirror_remote::RemoteStore;

use crate::plan::{plan, SyncPlan};
use crate::scan::scan_local;
use crate::SyncError;

/// Knobs for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleOptions {
    /// Compute and report the plan without calling `upload`/`delete`.
    pub dry_run: bool,
    /// Bypass the remote trash on delete.
    pub permanently_delete: bool,
}

/// Kind of a per-file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Upload,
    Delete,
}

/// Outcome of one per-file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OperationOutcome {
    Uploaded { name: FileName },
    Deleted { name: FileName },
    /// `--dry-run`: the file *would* have been uploaded.
    WouldUpload { name: FileName },
    /// `--dry-run`: the remote file *would* have been deleted.
    WouldDelete { name: FileName },
    /// The operation did not happen; the next cycle retries it.
    Failed {
        name: FileName,
        operation: Operation,
        error: String,
    },
}

impl OperationOutcome {
    pub fn name(&self) -> &FileName {
        match self {
            OperationOutcome::Uploaded { name }
            | OperationOutcome::Deleted { name }
            | OperationOutcome::WouldUpload { name }
            | OperationOutcome::WouldDelete { name }
            | OperationOutcome::Failed { name, .. } => name,
        }
    }
}

/// Everything one cycle did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub local_files: usize,
    pub remote_files: usize,
    pub outcomes: Vec<OperationOutcome>,
}

impl CycleReport {
    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::Uploaded { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::Deleted { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::Failed { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                OperationOutcome::WouldUpload { .. } | OperationOutcome::WouldDelete { .. }
            )
        })
    }

    fn count(&self, pred: impl Fn(&OperationOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Run one full cycle against `store`.
///
/// Fails only if the local scan or the remote listing fails; in that case no
/// file operation is attempted. Individual upload/delete failures are
/// reported in the returned [`CycleReport`].
pub fn run_cycle(
    local_root: &Path,
    store: &dyn RemoteStore,
    options: CycleOptions,
) -> Result<CycleReport, SyncError> {
    let local = scan_local(local_root)?;
    let remote = store.list()?;
    let plan = plan(&local, &remote);
    if plan.is_empty() {
        tracing::debug!("both folders empty, nothing to do");
    } else {
        tracing::debug!(
            uploads = plan.to_upload.len(),
            deletes = plan.to_delete.len(),
            "computed sync plan",
        );
    }

    Ok(CycleReport {
        local_files: local.len(),
        remote_files: remote.len(),
        outcomes: execute(local_root, store, &plan, options),
    })
}

/// Execute `plan`: every upload, then every delete.
///
/// A failing operation is logged and recorded; it never stops the rest.
pub fn execute(
    local_root: &Path,
    store: &dyn RemoteStore,
    plan: &SyncPlan,
    options: CycleOptions,
) -> Vec<OperationOutcome> {
    let mut outcomes = Vec::with_capacity(plan.to_upload.len() + plan.to_delete.len());

    for entry in &plan.to_upload {
        let name = entry.name.clone();
        if options.dry_run {
            tracing::info!(file = %name, "[dry-run] would upload");
            outcomes.push(OperationOutcome::WouldUpload { name });
            continue;
        }
        match store.upload(&local_root.join(name.as_str()), true) {
            Ok(()) => {
                tracing::info!(file = %name, folder = store.folder(), "file uploaded");
                outcomes.push(OperationOutcome::Uploaded { name });
            }
            Err(err) => {
                tracing::error!(file = %name, error = %err, "upload failed");
                outcomes.push(OperationOutcome::Failed {
                    name,
                    operation: Operation::Upload,
                    error: err.to_string(),
                });
            }
        }
    }

    for entry in &plan.to_delete {
        let name = entry.name.clone();
        if options.dry_run {
            tracing::info!(file = %name, "[dry-run] would delete");
            outcomes.push(OperationOutcome::WouldDelete { name });
            continue;
        }
        match store.delete(&name, options.permanently_delete) {
            Ok(()) => {
                tracing::info!(
                    file = %name,
                    permanently = options.permanently_delete,
                    "file deleted",
                );
                outcomes.push(OperationOutcome::Deleted { name });
            }
            Err(err) => {
                tracing::error!(file = %name, error = %err, "delete failed");
                outcomes.push(OperationOutcome::Failed {
                    name,
                    operation: Operation::Delete,
                    error: err.to_string(),
                });
            }
        }
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use std::fs;

    use diskmirror_remote::memory::{MemoryStore, StoreCall};
    use tempfile::TempDir;

    use super::*;

    fn outbox(names: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("outbox");
        for name in names {
            fs::write(dir.path().join(name), name.as_bytes()).expect("write");
        }
        dir
    }

    #[test]
    fn cycle_uploads_local_and_deletes_remote_only() {
        let dir = outbox(&["a.txt", "b.txt"]);
        let store = MemoryStore::with_objects("disk:/B", ["b.txt", "c.txt"]);

        let report = run_cycle(dir.path(), &store, CycleOptions::default()).expect("cycle");
        assert_eq!(report.uploaded(), 2);
        assert_eq!(report.deleted(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.local_files, 2);
        assert_eq!(report.remote_files, 2);
        assert_eq!(store.names(), vec!["a.txt", "b.txt"]);
        assert_eq!(store.contents("b.txt").as_deref(), Some(&b"b.txt"[..]));
        assert_eq!(store.trash_names(), vec!["c.txt"]);
    }

    #[test]
    fn unchanged_remote_file_is_overwritten_with_local_contents() {
        let dir = outbox(&["a.txt"]);
        let store = MemoryStore::new("disk:/B");
        store.insert("a.txt", b"older");

        run_cycle(dir.path(), &store, CycleOptions::default()).expect("cycle");
        assert_eq!(store.contents("a.txt").as_deref(), Some(&b"a.txt"[..]));
    }

    #[test]
    fn empty_folders_make_an_empty_report() {
        let dir = outbox(&[]);
        let store = MemoryStore::new("disk:/B");

        let report = run_cycle(dir.path(), &store, CycleOptions::default()).expect("cycle");
        assert!(report.outcomes.is_empty());
        assert_eq!(store.calls(), vec![StoreCall::List]);
    }

    #[test]
    fn uploads_run_before_deletes_and_always_overwrite() {
        let dir = outbox(&["a.txt"]);
        let store = MemoryStore::with_objects("disk:/B", ["z.txt"]);

        run_cycle(dir.path(), &store, CycleOptions::default()).expect("cycle");
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::List,
                StoreCall::Upload {
                    name: "a.txt".into(),
                    overwrite: true
                },
                StoreCall::Delete {
                    name: "z.txt".into(),
                    permanently: false
                },
            ]
        );
    }

    #[test]
    fn dry_run_reports_plan_without_touching_remote() {
        let dir = outbox(&["a.txt"]);
        let store = MemoryStore::with_objects("disk:/B", ["z.txt"]);
        let options = CycleOptions {
            dry_run: true,
            ..CycleOptions::default()
        };

        let report = run_cycle(dir.path(), &store, options).expect("cycle");
        assert_eq!(report.planned(), 2);
        assert_eq!(report.uploaded() + report.deleted(), 0);
        assert_eq!(store.calls(), vec![StoreCall::List]);
        assert_eq!(store.names(), vec!["z.txt"]);
    }

    #[test]
    fn permanent_delete_skips_trash() {
        let dir = outbox(&[]);
        let store = MemoryStore::with_objects("disk:/B", ["z.txt"]);
        let options = CycleOptions {
            permanently_delete: true,
            ..CycleOptions::default()
        };

        run_cycle(dir.path(), &store, options).expect("cycle");
        assert!(store.names().is_empty());
        assert!(store.trash_names().is_empty());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let outcome = OperationOutcome::Failed {
            name: FileName::from("a.txt"),
            operation: Operation::Upload,
            error: "HTTP 503".into(),
        };
        let value = serde_json::to_value(&outcome).expect("json");
        assert_eq!(value["outcome"], "failed");
        assert_eq!(value["operation"], "upload");
        assert_eq!(value["name"], "a.txt");
    }
}
