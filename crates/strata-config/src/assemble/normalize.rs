//! Shape checks applied before a configuration is handed to the host tool.

use serde_json::Value;
use strata_core::error::StrataError;
use strata_core::types::BuildConfig;

use crate::ConfigResult;

/// Library output formats the host tool understands
pub const KNOWN_FORMATS: &[&str] = &["es", "cjs", "umd", "iife"];

/// Validate the fields Strata relies on and return the configuration
pub fn define_config(config: BuildConfig) -> ConfigResult<BuildConfig> {
    if let Some(out_dir) = config.get("build.outDir") {
        match out_dir.as_str() {
            Some(dir) if !dir.is_empty() => {},
            _ => return Err(StrataError::invalid("build.outDir", "must be a non-empty string")),
        }
    }

    if let Some(entry) = config.get("build.lib.entry") {
        string_array("build.lib.entry", entry)?;
    }

    if let Some(formats) = config.get("build.lib.formats") {
        for format in string_array("build.lib.formats", formats)? {
            if !KNOWN_FORMATS.contains(&format) {
                return Err(StrataError::invalid(
                    "build.lib.formats",
                    format!("unknown format '{}', expected one of {}", format, KNOWN_FORMATS.join(", ")),
                ));
            }
        }
    }

    if let Some(exclude) = config.get("test.exclude") {
        string_array("test.exclude", exclude)?;
    }

    Ok(config)
}

fn string_array<'a>(field: &str, value: &'a Value) -> ConfigResult<Vec<&'a str>> {
    let items = value
        .as_array()
        .ok_or_else(|| StrataError::invalid(field, "must be an array of strings"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| StrataError::invalid(field, format!("expected a string, found {}", item)))
        })
        .collect()
}
