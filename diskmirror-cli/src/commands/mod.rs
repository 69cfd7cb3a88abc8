pub mod check;
pub mod once;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};

use diskmirror_core::{config, SyncConfig};
use diskmirror_remote::RemoteStore;

/// Resolve, parse and validate the config.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<SyncConfig> {
    config::load(explicit).context("failed to load config")
}

/// [`load_config`], then install console + file logging for a one-shot command.
pub(crate) fn load_config_with_logging(explicit: Option<&Path>) -> Result<SyncConfig> {
    let config = load_config(explicit)?;
    diskmirror_daemon::logging::init(&config).context("failed to open log file")?;
    Ok(config)
}

/// Make sure the remote folder exists, logging the result.
pub(crate) fn check_remote_folder(store: &dyn RemoteStore) -> Result<()> {
    match store.ensure_folder() {
        Ok(()) => {
            tracing::info!(folder = store.folder(), "remote folder ready");
            Ok(())
        }
        Err(err) => {
            tracing::error!(folder = store.folder(), error = %err, "folder check failed");
            Err(err).with_context(|| format!("remote folder check failed for {}", store.folder()))
        }
    }
}
