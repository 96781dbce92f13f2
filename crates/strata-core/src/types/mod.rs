//! Core data types for Strata build configuration.
//!
//! This module provides the fundamental types used throughout Strata:
//! - The assembled configuration and its partial layers
//! - The build context threaded into assembly
//! - The plugin trait for build-lifecycle hooks

pub mod config;
pub mod context;
pub mod plugin;

// Re-export all public types
pub use config::{BuildConfig, PartialConfig};
pub use context::BuildContext;
pub use plugin::{OutputOptions, Plugin, PluginRef};
