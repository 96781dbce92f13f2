//! Layered library build configuration for Strata
//!
//! This crate assembles the configuration handed to the host build tool: a
//! base library configuration (entry points, output layout, plugins, test
//! runner excludes) layered beneath caller-supplied merge and override
//! configurations.

pub mod assemble;
pub mod debug;
pub mod entries;
pub mod hooks;
pub mod loader;
pub mod merge;
pub mod plugins;
pub mod toml;

// Re-export main types
pub use assemble::{define_config, AssembleOptions, ConfigAssembler, PluginOpts};
pub use debug::DebugMode;
pub use entries::{resolve_entries, EntryGlobs};
pub use loader::{ConfigLoader, ConfigSource};
pub use merge::{ArrayPolicy, Merger};
pub use plugins::{ExternalizeDeps, TypesPlugin, TypesPluginOptions};
pub use self::toml::StrataToml;

use strata_core::error::StrataError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, StrataError>;
