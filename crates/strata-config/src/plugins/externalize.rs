//! Dependency externalization plugin descriptor.
//!
//! Marking dependencies as external is done by the host tool's externalization
//! plugin. Strata only carries its options so the plugin list is complete;
//! listing dependencies as plain externals would miss their subpath exports.

use serde_json::Value;
use strata_core::types::Plugin;

/// Name the externalization plugin registers under
pub const EXTERNALIZE_DEPS_NAME: &str = "externalize-deps";

/// Externalization plugin with opaque options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalizeDeps {
    options: Option<Value>,
}

impl ExternalizeDeps {
    /// Create the plugin, forwarding `options` untouched
    pub fn new(options: Option<Value>) -> Self {
        Self { options }
    }
}

impl Plugin for ExternalizeDeps {
    fn name(&self) -> &str {
        EXTERNALIZE_DEPS_NAME
    }

    fn options(&self) -> Value {
        self.options.clone().unwrap_or(Value::Null)
    }
}
