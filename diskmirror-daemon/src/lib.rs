//! Long-running mirror service: logging setup, remote folder check and the
//! interval-driven sync loop.

mod error;
pub mod logging;
mod runtime;

pub use error::DaemonError;
pub use runtime::{
    run, run_with_store, start_blocking, CycleSummary, LoopState, LoopStats, SyncLoop,
};
