//! diskmirror — mirror a local folder into a Yandex Disk folder.
//!
//! # Usage
//!
//! ```text
//! diskmirror [--config <path>] run
//! diskmirror [--config <path>] once [--dry-run] [--json]
//! diskmirror [--config <path>] check
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::once::OnceArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "diskmirror",
    version,
    about = "Mirror a local folder into a Yandex Disk folder",
    long_about = None,
)]
struct Cli {
    /// Config file (default: ./config.yaml, then ~/.diskmirror/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the sync loop until Ctrl-C.
    Run,

    /// Run a single reconciliation cycle and print what happened.
    Once(OnceArgs),

    /// Validate the config and make sure the remote folder exists.
    Check,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run => commands::run::run(config),
        Commands::Once(args) => args.run(config),
        Commands::Check => commands::check::run(config),
    }
}
