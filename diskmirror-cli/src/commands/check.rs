//! `diskmirror check` — config sanity plus remote folder bootstrap.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use diskmirror_remote::YandexDisk;
use diskmirror_sync::scan_local;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config_with_logging(config_path)?;

    let local = scan_local(&config.local_folder)
        .with_context(|| format!("failed to scan {}", config.local_folder.display()))?;

    let disk = YandexDisk::from_config(&config);
    super::check_remote_folder(&disk)?;

    println!(
        "{} {} ({} files) → {} every {}s",
        "✓".green().bold(),
        config.local_folder.display(),
        local.len(),
        config.remote_folder,
        config.sync_interval,
    );
    Ok(())
}
