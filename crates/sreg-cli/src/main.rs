//! # sreg CLI entry point
//!
//! Parses command-line arguments, installs logging, and dispatches to the
//! registry subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sreg_cli::commands::{run_registry, RegistryCommand};
use sreg_cli::config::CliConfig;

/// Student registry CLI
///
/// Students pay a fixed fee, register a name and age, and are authorized by
/// the registry owner into an ordered roster. The owner manages collected
/// fees.
#[derive(Parser, Debug)]
#[command(name = "sreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the registry state file.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: RegistryCommand,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("sreg CLI v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let state_path = config.state_path(cli.state.as_deref());
    tracing::debug!(state = %state_path.display(), "resolved state file");
    run_registry(&cli.command, &config, &state_path)
}
