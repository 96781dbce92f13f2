//! strata.toml parsing

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use strata_core::error::StrataError;

use crate::assemble::{AssembleOptions, PluginOpts};
use crate::debug::DebugMode;
use crate::merge::ArrayPolicy;
use crate::ConfigResult;

/// Contents of a strata.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrataToml {
    /// Entry globs replacing the defaults
    pub entry_globs: Option<Vec<String>>,

    /// Print the assembled configuration
    pub debug: DebugMode,

    /// Array policy of the merge layer
    pub merge_arrays: ArrayPolicy,

    /// Plugin options
    pub plugin_opts: PluginOpts,
}

impl StrataToml {
    /// Turn the file contents into assembly options rooted at `cwd`
    pub fn into_options(self, cwd: Utf8PathBuf) -> AssembleOptions {
        AssembleOptions {
            entry_globs: self.entry_globs,
            plugin_opts: self.plugin_opts,
            debug: self.debug,
            merge_arrays: self.merge_arrays,
            cwd: Some(cwd),
        }
    }
}

/// Parse strata.toml content
pub fn parse_strata_toml(content: &str) -> ConfigResult<StrataToml> {
    ::toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        StrataError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })
}

/// Load and parse strata.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<StrataToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StrataError::io(format!("Failed to read {}", path), e))?;

    parse_strata_toml(&content).map_err(|e| match e {
        StrataError::TomlParse { message, line, column } => StrataError::TomlParse {
            message: format!("in file {}: {}", path, message),
            line,
            column,
        },
        other => other,
    })
}

/// 1-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_strata_toml("").unwrap();
        assert!(config.entry_globs.is_none());
        assert!(!config.debug.is_enabled());
        assert_eq!(config.merge_arrays, ArrayPolicy::Replace);
        assert_eq!(config.plugin_opts, PluginOpts::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
entry_globs = ["src/**/*.ts", "!src/**/*.test.ts"]
debug = true
merge_arrays = "concat"

[plugin_opts.types_plugin]
dts_generator = "vue-tsc"
project = ""
no_flags = true
additional_args = ["--strict"]

[plugin_opts.externalize_deps]
devDeps = true
except = ["lodash"]
"#;

        let config = parse_strata_toml(toml).unwrap();
        assert_eq!(
            config.entry_globs,
            Some(vec!["src/**/*.ts".to_string(), "!src/**/*.test.ts".to_string()])
        );
        assert!(matches!(config.debug, DebugMode::Print));
        assert_eq!(config.merge_arrays, ArrayPolicy::Concat);

        let types = &config.plugin_opts.types_plugin;
        assert_eq!(types.dts_generator, "vue-tsc");
        assert_eq!(types.project.as_deref(), Some(""));
        assert!(types.no_flags);
        assert_eq!(types.root_dir, "src");

        assert_eq!(
            config.plugin_opts.externalize_deps,
            Some(json!({ "devDeps": true, "except": ["lodash"] }))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = parse_strata_toml("entry_glob = []\n");
        assert!(matches!(result, Err(StrataError::TomlParse { .. })));
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse_strata_toml("debug = true\nentry_globs = = 3\n").unwrap_err();
        match err {
            StrataError::TomlParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_line_column() {
        let content = "a = 1\nbb = 2\n";
        assert_eq!(line_column(content, 0), (1, 1));
        assert_eq!(line_column(content, 6), (2, 1));
        assert_eq!(line_column(content, 9), (2, 4));
    }

    #[test]
    fn test_into_options() {
        let config = parse_strata_toml("entry_globs = [\"lib/*.ts\"]\n").unwrap();
        let options = config.into_options(Utf8PathBuf::from("/project"));
        assert_eq!(options.entry_globs, Some(vec!["lib/*.ts".to_string()]));
        assert_eq!(options.cwd, Some(Utf8PathBuf::from("/project")));
    }
}
