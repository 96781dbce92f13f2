//! Recursive configuration layering
//!
//! Plain objects merge key by key. Every other kind of value (scalars, arrays,
//! plugin lists) is replaced by the overlay, unless the merger is configured to
//! concatenate arrays. A `null` overlay value never erases a base value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strata_core::types::{BuildConfig, PartialConfig};

/// How conflicting arrays are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayPolicy {
    /// The overlay array replaces the base array
    #[default]
    Replace,
    /// Overlay items first, then base items
    Concat,
}

/// Deep-merges configuration layers
#[derive(Debug, Clone, Copy, Default)]
pub struct Merger {
    arrays: ArrayPolicy,
}

impl Merger {
    /// Create a merger with the given array policy
    pub fn new(arrays: ArrayPolicy) -> Self {
        Self { arrays }
    }

    /// Merge `overlay` into `base` in place
    pub fn merge_into(&self, base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
        for (key, value) in overlay {
            if value.is_null() {
                continue;
            }

            let merged = match (base.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    self.merge_into(existing, incoming);
                    true
                },
                (Some(Value::Array(existing)), Value::Array(incoming))
                    if self.arrays == ArrayPolicy::Concat =>
                {
                    let mut combined = incoming.clone();
                    combined.append(existing);
                    *existing = combined;
                    true
                },
                _ => false,
            };

            if !merged {
                base.insert(key.clone(), value.clone());
            }
        }
    }

    /// Merge two option trees, returning the result
    pub fn merge(&self, base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
        let mut result = base.clone();
        self.merge_into(&mut result, overlay);
        result
    }

    /// Apply one configuration layer on top of `base`
    pub fn layer(&self, mut base: BuildConfig, layer: &PartialConfig) -> BuildConfig {
        if let Some(plugins) = &layer.plugins {
            base.plugins = match self.arrays {
                ArrayPolicy::Replace => plugins.clone(),
                ArrayPolicy::Concat => plugins.iter().chain(base.plugins.iter()).cloned().collect(),
            };
        }
        self.merge_into(&mut base.values, &layer.values);
        base
    }
}
