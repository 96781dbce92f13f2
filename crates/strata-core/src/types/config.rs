//! Configuration objects handed to the host build tool.
//!
//! A configuration is a typed plugin list next to a JSON tree of options in the
//! host tool's schema. Keys in the tree are addressed with dotted paths such as
//! `build.lib.entry`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::plugin::PluginRef;
use crate::error::{StrataError, StrataResult};

/// Key reserved for the plugin list in rendered configurations
pub const PLUGINS_KEY: &str = "plugins";

/// Fully assembled configuration
#[derive(Clone, Default)]
pub struct BuildConfig {
    /// Plugins in the order the host tool runs them
    pub plugins: Vec<PluginRef>,
    /// Option tree (everything except plugins)
    pub values: Map<String, Value>,
}

/// One layer of configuration applied over another
#[derive(Clone, Default)]
pub struct PartialConfig {
    /// Replacement plugin list, if this layer sets one
    pub plugins: Option<Vec<PluginRef>>,
    /// Partial option tree
    pub values: Map<String, Value>,
}

impl BuildConfig {
    /// Render the configuration as a single JSON value, plugins first
    pub fn to_value(&self) -> Value {
        let mut rendered = Map::new();
        rendered.insert(
            PLUGINS_KEY.to_string(),
            Value::Array(self.plugins.iter().map(|p| p.describe()).collect()),
        );
        for (key, value) in &self.values {
            rendered.insert(key.clone(), value.clone());
        }
        Value::Object(rendered)
    }

    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.values, path)
    }

    /// Set a value by dotted path, creating intermediate objects
    pub fn set(&mut self, path: &str, value: Value) {
        insert(&mut self.values, path, value);
    }

    /// The configured output directory (`build.outDir`)
    pub fn out_dir(&self) -> Option<&str> {
        self.get("build.outDir").and_then(Value::as_str)
    }

    /// The library entry points (`build.lib.entry`)
    pub fn entries(&self) -> Vec<&str> {
        self.get("build.lib.entry")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl PartialConfig {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layer from a JSON object.
    ///
    /// Plugins are runtime objects and cannot be expressed in JSON.
    pub fn from_value(value: Value) -> StrataResult<Self> {
        match value {
            Value::Object(values) => {
                if values.contains_key(PLUGINS_KEY) {
                    return Err(StrataError::invalid(
                        PLUGINS_KEY,
                        "plugins cannot be set from a JSON configuration layer",
                    ));
                }
                Ok(Self {
                    plugins: None,
                    values,
                })
            },
            other => Err(StrataError::JsonParse {
                message: format!("expected a JSON object, found {}", kind_of(&other)),
            }),
        }
    }

    /// Parse a layer from JSON text
    pub fn from_json_str(content: &str) -> StrataResult<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| StrataError::JsonParse {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Replace the plugin list in this layer
    pub fn with_plugins(mut self, plugins: Vec<PluginRef>) -> Self {
        self.plugins = Some(plugins);
        self
    }

    /// Set a value by dotted path
    pub fn with(mut self, path: &str, value: Value) -> Self {
        insert(&mut self.values, path, value);
        self
    }

    /// Whether this layer changes nothing
    pub fn is_empty(&self) -> bool {
        self.plugins.is_none() && self.values.is_empty()
    }
}

impl PartialEq for BuildConfig {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuildConfig({})", self.to_value())
    }
}

impl fmt::Debug for PartialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins = self
            .plugins
            .as_ref()
            .map(|plugins| plugins.iter().map(|p| p.name().to_string()).collect::<Vec<_>>());
        f.debug_struct("PartialConfig")
            .field("plugins", &plugins)
            .field("values", &self.values)
            .finish()
    }
}

impl Serialize for BuildConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn lookup<'a>(values: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn insert(values: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            values.insert(path.to_string(), value);
        },
        Some((head, rest)) => {
            let child = values
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert(map, rest, value);
            }
        },
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
