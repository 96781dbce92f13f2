//! `strata types` command implementation.
//!
//! Assembles the configuration, then runs the write-bundle hooks the host tool
//! would run once the library output exists. A failed declaration run makes
//! the command exit with status 1.

use camino::Utf8PathBuf;
use strata_config::{hooks, DebugMode};
use strata_core::error::StrataResult;
use strata_core::types::{BuildContext, OutputOptions};

use super::CommandContext;
use crate::LayerArgs;

/// Execute the `strata types` command
pub async fn execute(
    layers: LayerArgs,
    out_dir: Option<Utf8PathBuf>,
    debug: bool,
    ctx: &CommandContext,
) -> StrataResult<()> {
    let mut options = ctx.load_options().await?;
    if debug {
        options.debug = DebugMode::Print;
    }

    let assembler = ctx.assembler(&layers, options).await?;
    let config = assembler.assemble(&BuildContext::from_env(layers.mode))?;

    let output = match out_dir {
        Some(dir) => OutputOptions::with_dir(dir),
        None => OutputOptions::from_config(&config),
    };

    match &output.dir {
        Some(dir) => ctx.output.step("📝", &format!("Emitting type declarations into {}", dir)),
        None => ctx.output.step("📝", "Emitting type declarations"),
    }

    if let Err(err) = hooks::write_bundle(&config, &output).await {
        if err.is_generator_failure() {
            let dir = output.dir.as_ref().map(|d| d.as_str()).unwrap_or("the output directory");
            ctx.output.warn(&format!("Type declarations in {} may be stale or missing", dir));
        }
        return Err(err);
    }

    ctx.output.success("Type declarations emitted");
    Ok(())
}
