//! `strata entries` command implementation.
//!
//! Lists the library entry points the configured globs resolve to.

use strata_config::entries::{resolve_entries, DEFAULT_ENTRY_GLOBS};
use strata_core::error::StrataResult;

use super::CommandContext;

/// Execute the `strata entries` command
pub async fn execute(globs: Vec<String>, ctx: &CommandContext) -> StrataResult<()> {
    let globs = if globs.is_empty() {
        ctx.load_options()
            .await?
            .entry_globs
            .unwrap_or_else(|| DEFAULT_ENTRY_GLOBS.iter().map(|g| g.to_string()).collect())
    } else {
        globs
    };

    let entries = resolve_entries(&globs, &ctx.cwd)?;
    if entries.is_empty() {
        ctx.output.warn(&format!("No entry points matched {}", globs.join(" ")));
        return Ok(());
    }

    for entry in &entries {
        ctx.output.raw(entry.as_str());
    }
    Ok(())
}
