//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking a CommandContext.

use camino::Utf8PathBuf;
use strata_config::{AssembleOptions, ConfigAssembler, ConfigLoader, ConfigSource};
use strata_core::error::{StrataError, StrataResult};
use tracing::{debug, info};

pub mod entries;
pub mod show;
pub mod types;


use crate::{output::OutputHandler, Commands, LayerArgs};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a new command context in the process working directory
    pub fn new() -> StrataResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| StrataError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|e| StrataError::invalid("cwd", format!("Working directory is not UTF-8: {}", e)))?;

        let output = OutputHandler::new();

        Ok(Self { cwd, output })
    }

    fn loader(&self) -> ConfigLoader {
        ConfigLoader::new(self.cwd.clone())
    }

    /// Load assembly options from strata.toml or defaults
    pub async fn load_options(&self) -> StrataResult<AssembleOptions> {
        let (options, source) = self.loader().load_options().await?;
        match source {
            ConfigSource::File(path) => debug!("Using options from {}", path),
            ConfigSource::Defaults => debug!("Using default options"),
        }
        Ok(options)
    }

    /// Build an assembler from strata.toml and the layer files in `layers`
    pub async fn assembler(&self, layers: &LayerArgs, options: AssembleOptions) -> StrataResult<ConfigAssembler> {
        let loader = self.loader();
        let merge = match &layers.merge {
            Some(path) => Some(loader.load_layer(path).await?),
            None => None,
        };
        let overrides = match &layers.overrides {
            Some(path) => Some(loader.load_layer(path).await?),
            None => None,
        };
        Ok(ConfigAssembler::new(options, merge, overrides))
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> StrataResult<()> {
    match command {
        Commands::Show { layers } => {
            info!("Showing configuration (mode: {})", layers.mode);
            show::execute(layers, ctx).await
        }
        Commands::Entries { globs } => {
            info!("Listing entries (globs: {:?})", globs);
            entries::execute(globs, ctx).await
        }
        Commands::Types { layers, out_dir, debug } => {
            info!("Emitting type declarations (out_dir: {:?})", out_dir);
            types::execute(layers, out_dir, debug, ctx).await
        }
        Commands::Version => show_version(ctx).await,
    }
}

async fn show_version(ctx: &CommandContext) -> StrataResult<()> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.info(&format!("strata v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.info(&format!("Built: {} ({})", env!("STRATA_BUILD_DATE"), env!("STRATA_BUILD_PROFILE")));
    ctx.output.info(&format!("Target: {}", target));

    Ok(())
}
