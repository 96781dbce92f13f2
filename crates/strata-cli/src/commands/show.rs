//! `strata show` command implementation.
//!
//! Prints the assembled configuration as JSON.

use strata_config::{debug::render, DebugMode};
use strata_core::error::StrataResult;
use strata_core::types::BuildContext;

use super::CommandContext;
use crate::LayerArgs;

/// Execute the `strata show` command
pub async fn execute(layers: LayerArgs, ctx: &CommandContext) -> StrataResult<()> {
    let mut options = ctx.load_options().await?;
    // Printed below; the debug setting would print it twice
    options.debug = DebugMode::Off;

    let assembler = ctx.assembler(&layers, options).await?;
    let config = assembler.assemble(&BuildContext::from_env(layers.mode))?;

    ctx.output.raw(&render(&config)?);
    Ok(())
}
