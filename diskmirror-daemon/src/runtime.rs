use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use diskmirror_core::SyncConfig;
use diskmirror_remote::{RemoteStore, YandexDisk};
use diskmirror_sync::{run_cycle, CycleOptions, CycleReport};

use crate::error::{io_err, DaemonError};

/// Phase of the sync loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Sleeping between cycles.
    Idle,
    /// Executing the numbered reconciliation cycle.
    Cycling { cycle: u64 },
}

/// Per-cycle summary, logged after every completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub cycle: u64,
    pub local_files: usize,
    pub remote_files: usize,
    pub uploaded: usize,
    pub deleted: usize,
    pub failed: usize,
    pub duration_ms: u128,
}

/// Counters returned when the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub cycles: u64,
    /// Cycles that ended before executing any operation (scan/list failure).
    pub failed_cycles: u64,
    /// Completed cycles in which at least one upload or delete failed.
    pub cycles_with_failed_operations: u64,
}

/// Drives reconciliation cycles on a fixed interval.
///
/// Cycles never overlap: the sleep starts only after the previous cycle has
/// fully finished. Shutdown is observed between cycles.
pub struct SyncLoop {
    store: Arc<dyn RemoteStore>,
    local_root: PathBuf,
    interval: Duration,
    options: CycleOptions,
    state_tx: watch::Sender<LoopState>,
}

impl SyncLoop {
    pub fn new(
        store: Arc<dyn RemoteStore>,
        local_root: PathBuf,
        interval: Duration,
        options: CycleOptions,
    ) -> Self {
        let (state_tx, _) = watch::channel(LoopState::Idle);
        Self {
            store,
            local_root,
            interval,
            options,
            state_tx,
        }
    }

    /// Observe [`LoopState`] transitions.
    pub fn state(&self) -> watch::Receiver<LoopState> {
        self.state_tx.subscribe()
    }

    /// Run until a shutdown message arrives (or every sender is dropped).
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> LoopStats {
        let mut stats = LoopStats::default();

        loop {
            stats.cycles += 1;
            let cycle = stats.cycles;
            self.state_tx.send_replace(LoopState::Cycling { cycle });

            match self.cycle_once(cycle).await {
                Ok(summary) if summary.failed > 0 => {
                    stats.cycles_with_failed_operations += 1;
                    tracing::warn!(
                        cycle = summary.cycle,
                        uploaded = summary.uploaded,
                        deleted = summary.deleted,
                        failed = summary.failed,
                        duration_ms = summary.duration_ms,
                        "sync cycle completed with failures",
                    );
                }
                Ok(summary) => {
                    tracing::info!(
                        cycle = summary.cycle,
                        uploaded = summary.uploaded,
                        deleted = summary.deleted,
                        duration_ms = summary.duration_ms,
                        "sync cycle completed",
                    );
                }
                Err(err) => {
                    stats.failed_cycles += 1;
                    tracing::error!(cycle, error = %err, "sync cycle failed");
                }
            }

            self.state_tx.send_replace(LoopState::Idle);

            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        stats
    }

    async fn cycle_once(&self, cycle: u64) -> Result<CycleSummary, DaemonError> {
        let started = Instant::now();
        let store = self.store.clone();
        let root = self.local_root.clone();
        let options = self.options;

        let report = tokio::task::spawn_blocking(move || run_cycle(&root, store.as_ref(), options))
            .await
            .map_err(|err| DaemonError::Runtime(format!("sync cycle join error: {err}")))??;

        Ok(build_cycle_summary(cycle, &report, started.elapsed()))
    }
}

/// Validate `config`, then run the service against Yandex Disk until Ctrl-C.
///
/// Logging must already be initialised (see [`crate::logging::init`]).
pub async fn run(config: SyncConfig) -> Result<(), DaemonError> {
    config.validate()?;
    let store: Arc<dyn RemoteStore> = Arc::new(YandexDisk::from_config(&config));
    let (shutdown_tx, _) = broadcast::channel::<()>(16);
    run_with_store(&config, store, shutdown_tx).await
}

/// Start the service and block the current thread until it exits.
pub fn start_blocking(config: SyncConfig) -> Result<(), DaemonError> {
    crate::logging::init(&config)?;
    tracing::info!(
        local = %config.local_folder.display(),
        remote = %config.remote_folder,
        interval_secs = config.sync_interval,
        "starting synchronization service",
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    let result = runtime.block_on(run(config));
    if let Err(err) = &result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

/// Check the remote folder, then run the sync loop until `shutdown_tx` fires.
///
/// A failing folder check is fatal and returns before the first cycle.
pub async fn run_with_store(
    config: &SyncConfig,
    store: Arc<dyn RemoteStore>,
    shutdown_tx: broadcast::Sender<()>,
) -> Result<(), DaemonError> {
    check_remote_folder(store.clone()).await?;

    let options = CycleOptions {
        dry_run: false,
        permanently_delete: config.permanently_delete,
    };
    let sync_loop = SyncLoop::new(store, config.local_folder.clone(), config.interval(), options);

    let loop_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let stats = sync_loop.run(shutdown_rx).await;
            let _ = shutdown.send(());
            stats
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, stopping after the current cycle");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(DaemonError::Runtime(format!("ctrl-c handler failed: {err}"))),
                    }
                }
            }
        })
    };

    let (loop_result, signal_result) = tokio::join!(loop_handle, signal_handle);

    let stats = loop_result
        .map_err(|err| DaemonError::Runtime(format!("sync_loop task join failure: {err}")))?;
    tracing::info!(
        cycles = stats.cycles,
        failed_cycles = stats.failed_cycles,
        "synchronization service stopped",
    );
    handle_join("signal_handler", signal_result)
}

async fn check_remote_folder(store: Arc<dyn RemoteStore>) -> Result<(), DaemonError> {
    let folder = store.folder().to_string();
    let checked = tokio::task::spawn_blocking(move || store.ensure_folder())
        .await
        .map_err(|err| DaemonError::Runtime(format!("folder check join error: {err}")))?;
    checked.map_err(|source| {
        tracing::error!(folder = %folder, error = %source, "folder check failed");
        DaemonError::FolderCheck { folder, source }
    })
}

fn build_cycle_summary(cycle: u64, report: &CycleReport, duration: Duration) -> CycleSummary {
    CycleSummary {
        cycle,
        local_files: report.local_files,
        remote_files: report.remote_files,
        uploaded: report.uploaded(),
        deleted: report.deleted(),
        failed: report.failed(),
        duration_ms: duration.as_millis(),
    }
}

fn handle_join(
    task: &str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Runtime(format!(
            "{task} task join failure: {err}"
        ))),
    }
}
