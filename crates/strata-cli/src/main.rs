//! # strata-cli
//!
//! Command line interface for Strata library build configuration.
//!
//! Parses commands, sets up logging and error reporting, and dispatches to the
//! command handlers. Any error ends the process with exit status 1.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use strata_core::error::StrataResult;
use tracing::{error, info};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Layered library build configuration
#[derive(Parser)]
#[command(name = "strata", version, about = "Layered library build configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble and print the build configuration
    Show {
        #[command(flatten)]
        layers: LayerArgs,
    },
    /// List resolved entry points
    Entries {
        /// Globs replacing the configured ones; prefix with ! to exclude
        globs: Vec<String>,
    },
    /// Emit type declarations into the output directory
    Types {
        #[command(flatten)]
        layers: LayerArgs,
        /// Output directory, defaults to the configured build.outDir
        #[arg(long, value_name = "DIR")]
        out_dir: Option<Utf8PathBuf>,
        /// Print the assembled configuration first
        #[arg(long)]
        debug: bool,
    },
    /// Show version information
    Version,
}

/// Build mode and configuration layers
#[derive(Args, Debug, Clone)]
pub struct LayerArgs {
    /// Build mode passed to assembly
    #[arg(long, env = "STRATA_MODE", default_value = "production")]
    pub mode: String,

    /// JSON configuration merged over the base configuration
    #[arg(long, value_name = "FILE")]
    pub merge: Option<Utf8PathBuf>,

    /// JSON configuration applied last
    #[arg(long = "override", value_name = "FILE")]
    pub overrides: Option<Utf8PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting strata v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run_cli(cli) {
        error!("{}", err);
        eprint!("{}", ErrorFormatter::new().format_error(&err));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> StrataResult<()> {
    // Create Tokio runtime for the declaration hook
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| strata_core::error::StrataError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new()?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "strata_cli={level},strata_config={level},strata_core={level}"
        ))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("strata encountered an unexpected error: {}", panic_info);
        eprintln!("strata crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/strata-build/strata/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
