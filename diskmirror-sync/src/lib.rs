//! # diskmirror-sync
//!
//! Local scanning, reconciliation and cycle execution.
//!
//! Call [`run_cycle`] to mirror a local folder onto a [`RemoteStore`] once,
//! or use [`scan_local`] and [`plan`] directly to inspect what a cycle would do.
//!
//! [`RemoteStore`]: diskmirror_remote::RemoteStore

pub mod error;
pub mod pipeline;
pub mod plan;
pub mod scan;

pub use error::SyncError;
pub use pipeline::{run_cycle, CycleOptions, CycleReport, Operation, OperationOutcome};
pub use plan::{plan, SyncPlan};
pub use scan::scan_local;
