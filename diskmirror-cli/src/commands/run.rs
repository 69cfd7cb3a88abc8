//! `diskmirror run` — the long-running mirror service.

use std::path::Path;

use anyhow::{Context, Result};

use diskmirror_daemon::start_blocking;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    start_blocking(config).context("synchronization service exited with error")
}
