//! Error types and result aliases for Strata operations.
//!
//! Provides a unified error type that covers every failure the configuration
//! layering and the declaration hook can surface, with actionable messages.

use thiserror::Error;

/// Unified error type for all Strata operations
#[derive(Error, Debug)]
pub enum StrataError {
    // Config errors
    #[error("Failed to parse strata.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Failed to parse JSON configuration: {message}")]
    JsonParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Entry discovery errors
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    // Declaration generator errors
    #[error("Failed to spawn '{program}'")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Declaration generator '{program}' exited with code {code}")]
    DeclarationFailed { program: String, code: i32 },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Strata operations
pub type StrataResult<T> = Result<T, StrataError>;

impl StrataError {
    /// Create a validation error for a configuration field
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Whether this error came from the external declaration generator
    pub fn is_generator_failure(&self) -> bool {
        matches!(
            self,
            StrataError::ProcessSpawn { .. } | StrataError::DeclarationFailed { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            StrataError::ProcessSpawn { .. } => {
                Some("Install the declaration generator or set plugin_opts.types_plugin.dts_generator")
            },
            StrataError::DeclarationFailed { .. } => {
                Some("Fix the type errors reported above; declarations were not regenerated")
            },
            StrataError::InvalidGlob { .. } => Some("Check entry_globs in strata.toml"),
            StrataError::ConfigValidation { field, .. } if field == "outDir" => {
                Some("Set build.outDir or pass --out-dir")
            },
            _ => None,
        }
    }
}
