//! # strata-core
//!
//! Core types and utilities shared across all Strata crates.
//!
//! This crate provides:
//! - BuildConfig and PartialConfig, the layered configuration objects
//! - The Plugin trait implemented by build-lifecycle hooks
//! - StrataError enum for unified error handling
//! - Path helpers used by entry discovery
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (BuildConfig, BuildContext, Plugin, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{StrataError, StrataResult};
pub use types::{BuildConfig, BuildContext, OutputOptions, PartialConfig, Plugin, PluginRef};
