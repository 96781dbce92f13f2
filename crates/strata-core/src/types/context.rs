//! Build context threaded into configuration assembly.

use serde::{Deserialize, Serialize};

/// Mode name that enables output-directory clearing
pub const PRODUCTION_MODE: &str = "production";

/// Environment variable signalling a continuous-integration run
pub const CI_ENV_VAR: &str = "CI";

/// Inputs that vary per invocation of the host tool.
///
/// The CI flag is a plain field so assembly never reads the process
/// environment on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContext {
    /// Build mode reported by the host tool (e.g. "production", "development")
    pub mode: String,
    /// Whether the build runs on a continuous-integration machine
    pub ci: bool,
}

impl BuildContext {
    /// Create a context with an explicit CI flag
    pub fn new(mode: impl Into<String>, ci: bool) -> Self {
        Self {
            mode: mode.into(),
            ci,
        }
    }

    /// Create a context, reading the CI flag from the process environment
    pub fn from_env(mode: impl Into<String>) -> Self {
        let ci = std::env::var_os(CI_ENV_VAR).map_or(false, |v| !v.is_empty());
        Self::new(mode, ci)
    }

    /// Check if this is a production build
    pub fn is_production(&self) -> bool {
        self.mode == PRODUCTION_MODE
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(PRODUCTION_MODE, false)
    }
}
