//! Build-lifecycle plugins.
//!
//! Plugins are opaque objects inside a configuration: they are never merged
//! field by field, only replaced as a whole.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use super::config::BuildConfig;
use crate::error::StrataResult;

/// Shared handle to a plugin
pub type PluginRef = Arc<dyn Plugin>;

/// Output options the host tool resolved for the current build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Directory the main output was written to
    pub dir: Option<Utf8PathBuf>,
}

impl OutputOptions {
    /// Output options pointing at `dir`
    pub fn with_dir(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Derive output options from an assembled configuration's `build.outDir`
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            dir: config.out_dir().map(Utf8PathBuf::from),
        }
    }
}

/// A build-lifecycle hook registered in the plugin list
#[async_trait]
pub trait Plugin: fmt::Debug + Send + Sync {
    /// Plugin name as reported to the host tool
    fn name(&self) -> &str;

    /// Options rendered when the configuration is printed or compared
    fn options(&self) -> Value {
        Value::Null
    }

    /// Called after the host tool has written the main output
    async fn write_bundle(&self, _output: &OutputOptions) -> StrataResult<()> {
        Ok(())
    }

    /// Structural rendering used for printing and equality
    fn describe(&self) -> Value {
        json!({
            "name": self.name(),
            "options": self.options(),
        })
    }
}
