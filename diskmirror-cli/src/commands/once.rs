//! `diskmirror once` — run a single reconciliation cycle in the foreground.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use diskmirror_remote::YandexDisk;
use diskmirror_sync::{run_cycle, CycleOptions, CycleReport, Operation, OperationOutcome};

/// Arguments for `diskmirror once`.
#[derive(Args, Debug)]
pub struct OnceArgs {
    /// Show what would be uploaded and deleted without touching the remote.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the cycle report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "detail")]
    detail: String,
}

impl OnceArgs {
    pub fn run(self, config_path: Option<&Path>) -> Result<()> {
        let config = super::load_config_with_logging(config_path)?;
        let disk = YandexDisk::from_config(&config);

        if !self.dry_run {
            super::check_remote_folder(&disk)?;
        }

        let options = CycleOptions {
            dry_run: self.dry_run,
            permanently_delete: config.permanently_delete,
        };
        let report = run_cycle(&config.local_folder, &disk, options).context("sync cycle failed")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize cycle report")?
            );
        } else {
            print_report(&report, self.dry_run);
        }

        let failed = report.failed();
        if failed > 0 {
            bail!("{failed} operation(s) failed; the next cycle will retry them");
        }
        Ok(())
    }
}

fn print_report(report: &CycleReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if report.outcomes.is_empty() {
        println!(
            "{prefix}✓ nothing to do ({} local, {} remote)",
            report.local_files, report.remote_files
        );
        return;
    }

    let rows: Vec<OutcomeRow> = report.outcomes.iter().map(outcome_row).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if dry_run {
        println!(
            "{prefix}{} to upload, {} to delete",
            count(report, |o| matches!(o, OperationOutcome::WouldUpload { .. })),
            count(report, |o| matches!(o, OperationOutcome::WouldDelete { .. })),
        );
    } else {
        println!(
            "✓ {} uploaded, {} deleted, {} failed",
            report.uploaded(),
            report.deleted(),
            report.failed(),
        );
    }
}

fn count(report: &CycleReport, pred: impl Fn(&OperationOutcome) -> bool) -> usize {
    report.outcomes.iter().filter(|o| pred(o)).count()
}

fn outcome_row(outcome: &OperationOutcome) -> OutcomeRow {
    let (marker, action, detail) = match outcome {
        OperationOutcome::Uploaded { .. } => ("✎".green().to_string(), "upload", String::new()),
        OperationOutcome::Deleted { .. } => ("✗".yellow().to_string(), "delete", String::new()),
        OperationOutcome::WouldUpload { .. } => ("~".cyan().to_string(), "upload", "planned".to_string()),
        OperationOutcome::WouldDelete { .. } => ("~".cyan().to_string(), "delete", "planned".to_string()),
        OperationOutcome::Failed {
            operation, error, ..
        } => (
            "!".red().bold().to_string(),
            match operation {
                Operation::Upload => "upload",
                Operation::Delete => "delete",
            },
            error.clone(),
        ),
    };
    OutcomeRow {
        marker,
        file: outcome.name().to_string(),
        action: action.to_string(),
        detail,
    }
}
