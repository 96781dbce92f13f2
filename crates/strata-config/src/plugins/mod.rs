//! Plugins placed in the base configuration's plugin list.

pub mod externalize;
pub mod types;

pub use externalize::{ExternalizeDeps, EXTERNALIZE_DEPS_NAME};
pub use types::{TypesPlugin, TypesPluginOptions, TYPES_PLUGIN_NAME};
