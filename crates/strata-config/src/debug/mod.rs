//! Debug output for assembled configurations

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use strata_core::error::{StrataError, StrataResult};
use strata_core::types::BuildConfig;

/// Callback receiving the assembled configuration
pub type InspectFn = Arc<dyn Fn(&BuildConfig) + Send + Sync>;

/// What to do with the assembled configuration before returning it
#[derive(Clone, Default)]
pub enum DebugMode {
    /// Do nothing
    #[default]
    Off,
    /// Print the full configuration to stdout
    Print,
    /// Hand the configuration to a callback
    Inspect(InspectFn),
}

impl DebugMode {
    /// Debug mode calling `f` with the assembled configuration
    pub fn inspect<F>(f: F) -> Self
    where
        F: Fn(&BuildConfig) + Send + Sync + 'static,
    {
        Self::Inspect(Arc::new(f))
    }

    /// Whether any debug output happens
    pub fn is_enabled(&self) -> bool {
        !matches!(self, DebugMode::Off)
    }

    /// Emit the configuration to stdout or the callback
    pub fn emit(&self, config: &BuildConfig) -> StrataResult<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.emit_to(config, &mut handle)
    }

    /// Emit the configuration to `out` or the callback
    pub fn emit_to<W: Write>(&self, config: &BuildConfig, out: &mut W) -> StrataResult<()> {
        match self {
            DebugMode::Off => Ok(()),
            DebugMode::Print => {
                let rendered = render(config)?;
                writeln!(out, "{}", rendered)
                    .map_err(|e| StrataError::io("Failed to print configuration".to_string(), e))
            },
            DebugMode::Inspect(f) => {
                f(config);
                Ok(())
            },
        }
    }
}

/// Render a configuration fully expanded, as pretty JSON
pub fn render(config: &BuildConfig) -> StrataResult<String> {
    serde_json::to_string_pretty(&config.to_value()).map_err(|e| StrataError::JsonParse {
        message: format!("Failed to render configuration: {}", e),
    })
}

impl From<bool> for DebugMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            DebugMode::Print
        } else {
            DebugMode::Off
        }
    }
}

impl fmt::Debug for DebugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugMode::Off => f.write_str("Off"),
            DebugMode::Print => f.write_str("Print"),
            DebugMode::Inspect(_) => f.write_str("Inspect(<callback>)"),
        }
    }
}

impl<'de> Deserialize<'de> for DebugMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(DebugMode::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn sample() -> BuildConfig {
        let mut config = BuildConfig::default();
        config.set("build.outDir", json!("dist"));
        config.set("build.rollupOptions.output.preserveModules", json!(true));
        config
    }

    #[test]
    fn test_print_contains_out_dir() {
        let mut out = Vec::new();
        DebugMode::Print.emit_to(&sample(), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"dist\""));
        assert!(printed.contains("preserveModules"));
    }

    #[test]
    fn test_off_prints_nothing() {
        let mut out = Vec::new();
        DebugMode::Off.emit_to(&sample(), &mut out).unwrap();
        assert!(out.is_empty());
        assert!(!DebugMode::Off.is_enabled());
    }

    #[test]
    fn test_inspect_receives_config() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let mode = DebugMode::inspect(move |config| {
            *sink.lock().unwrap() = config.out_dir().map(String::from);
        });

        let mut out = Vec::new();
        mode.emit_to(&sample(), &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(seen.lock().unwrap().as_deref(), Some("dist"));
    }

    #[test]
    fn test_from_bool() {
        assert!(matches!(DebugMode::from(true), DebugMode::Print));
        assert!(matches!(DebugMode::from(false), DebugMode::Off));
    }
}
