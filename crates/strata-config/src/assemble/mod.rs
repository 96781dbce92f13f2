//! Library build configuration assembly
//!
//! The base configuration builds an ES module library from the resolved entry
//! points, keeps the source module layout in the output, externalizes
//! dependencies and emits type declarations after the build. Caller layers are
//! applied on top: `override > merge > base`.

mod normalize;

pub use normalize::{define_config, KNOWN_FORMATS};

use camino::Utf8PathBuf;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use strata_core::error::StrataError;
use strata_core::types::{BuildConfig, BuildContext, PartialConfig, PluginRef};
use tracing::{debug, info};

use crate::debug::DebugMode;
use crate::entries::{resolve_entries, DEFAULT_ENTRY_GLOBS};
use crate::merge::{ArrayPolicy, Merger};
use crate::plugins::{ExternalizeDeps, TypesPlugin, TypesPluginOptions};
use crate::ConfigResult;

/// Default output directory
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Source root the output module layout is preserved from
pub const SOURCE_ROOT: &str = "src";

/// Host test-runner excludes, kept when adding our own
pub const TEST_RUNNER_DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/cypress/**",
    "**/.{idea,git,cache,output,temp}/**",
    "**/{karma,rollup,webpack,vite,vitest,jest,ava,babel,nyc,cypress,tsup,build,eslint,prettier}.config.*",
];

/// Local environment-manager directory (nix devenv / direnv)
pub const ENV_MANAGER_EXCLUDE: &str = ".direnv/**/*";

/// Options forwarded to the base configuration's plugins
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginOpts {
    /// Declaration hook options
    pub types_plugin: TypesPluginOptions,
    /// Externalization plugin options, passed through untouched
    pub externalize_deps: Option<Value>,
}

/// Caller options for assembly
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Replaces the default entry globs; `!`-prefixed globs exclude
    pub entry_globs: Option<Vec<String>>,
    /// Plugin options
    pub plugin_opts: PluginOpts,
    /// Debug output of the assembled configuration
    pub debug: DebugMode,
    /// Array policy of the merge layer (the override layer always replaces)
    pub merge_arrays: ArrayPolicy,
    /// Directory globs are resolved against; the process working directory if unset
    pub cwd: Option<Utf8PathBuf>,
}

/// Builds configurations for the host tool.
///
/// Assembly is repeatable: every call resolves entries again and yields a
/// fresh configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigAssembler {
    options: AssembleOptions,
    merge: Option<PartialConfig>,
    overrides: Option<PartialConfig>,
}

impl ConfigAssembler {
    /// Create an assembler from options and the merge/override layers
    pub fn new(options: AssembleOptions, merge: Option<PartialConfig>, overrides: Option<PartialConfig>) -> Self {
        Self {
            options,
            merge,
            overrides,
        }
    }

    /// Assemble the configuration for one build
    pub fn assemble(&self, ctx: &BuildContext) -> ConfigResult<BuildConfig> {
        info!("Assembling configuration (mode: {}, ci: {})", ctx.mode, ctx.ci);

        let mut config = self.base_config(ctx)?;

        if let Some(layer) = &self.merge {
            debug!("Applying merge layer ({:?} arrays)", self.options.merge_arrays);
            config = Merger::new(self.options.merge_arrays).layer(config, layer);
        }
        if let Some(layer) = &self.overrides {
            debug!("Applying override layer");
            config = Merger::new(ArrayPolicy::Replace).layer(config, layer);
        }

        let config = define_config(config)?;
        self.options.debug.emit(&config)?;
        Ok(config)
    }

    /// The base configuration, before any caller layer
    pub fn base_config(&self, ctx: &BuildContext) -> ConfigResult<BuildConfig> {
        let cwd = self.working_dir()?;
        let entries = match &self.options.entry_globs {
            Some(globs) => resolve_entries(globs, &cwd)?,
            None => resolve_entries(DEFAULT_ENTRY_GLOBS, &cwd)?,
        };
        debug!("Using {} entry points from {}", entries.len(), cwd);

        let mut test = json!({
            "exclude": TEST_RUNNER_DEFAULT_EXCLUDES
                .iter()
                .copied()
                .chain(std::iter::once(ENV_MANAGER_EXCLUDE))
                .collect::<Vec<_>>(),
        });
        if ctx.ci {
            test["cache"] = json!(false);
        }

        let mut config = BuildConfig {
            plugins: self.base_plugins(),
            ..BuildConfig::default()
        };
        config.set(
            "build",
            json!({
                "outDir": DEFAULT_OUT_DIR,
                "lib": {
                    "entry": entries,
                    "formats": ["es"],
                },
                "rollupOptions": {
                    "output": {
                        "preserveModulesRoot": SOURCE_ROOT,
                        "preserveModules": true,
                    },
                },
                "minify": false,
                // clearing dist in watch builds breaks consumers linked in a monorepo
                "emptyOutDir": ctx.is_production(),
            }),
        );
        config.set("test", test);
        Ok(config)
    }

    fn base_plugins(&self) -> Vec<PluginRef> {
        let opts = &self.options.plugin_opts;
        vec![
            Arc::new(ExternalizeDeps::new(opts.externalize_deps.clone())),
            Arc::new(TypesPlugin::new(opts.types_plugin.clone())),
        ]
    }

    fn working_dir(&self) -> ConfigResult<Utf8PathBuf> {
        if let Some(cwd) = &self.options.cwd {
            return Ok(cwd.clone());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| StrataError::io("Failed to get current directory".to_string(), e))?;
        Utf8PathBuf::try_from(cwd).map_err(|e| StrataError::invalid("cwd", format!("Working directory is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{EXTERNALIZE_DEPS_NAME, TYPES_PLUGIN_NAME};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn project(files: &[&str]) -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export const x = 1;\n").unwrap();
        }
        (temp_dir, root)
    }

    fn options_in(root: &Utf8PathBuf) -> AssembleOptions {
        AssembleOptions {
            cwd: Some(root.clone()),
            ..AssembleOptions::default()
        }
    }

    #[test]
    fn test_base_configuration() {
        let (_temp, root) = project(&["src/index.ts", "src/index.test.ts"]);
        let assembler = ConfigAssembler::new(options_in(&root), None, None);

        let config = assembler.assemble(&BuildContext::new("production", false)).unwrap();

        assert_eq!(config.out_dir(), Some("dist"));
        assert_eq!(config.entries(), vec!["src/index.test.ts", "src/index.ts"]);
        assert_eq!(config.get("build.lib.formats"), Some(&json!(["es"])));
        assert_eq!(config.get("build.rollupOptions.output.preserveModulesRoot"), Some(&json!("src")));
        assert_eq!(config.get("build.rollupOptions.output.preserveModules"), Some(&json!(true)));
        assert_eq!(config.get("build.minify"), Some(&json!(false)));
        assert_eq!(config.get("build.emptyOutDir"), Some(&json!(true)));
        assert_eq!(config.get("test.cache"), None);

        let exclude = config.get("test.exclude").and_then(Value::as_array).unwrap();
        assert_eq!(exclude.len(), TEST_RUNNER_DEFAULT_EXCLUDES.len() + 1);
        assert_eq!(exclude.last(), Some(&json!(".direnv/**/*")));

        let names: Vec<_> = config.plugins.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec![EXTERNALIZE_DEPS_NAME, TYPES_PLUGIN_NAME]);
    }

    #[test]
    fn test_mode_and_ci() {
        let (_temp, root) = project(&["src/index.ts"]);
        let assembler = ConfigAssembler::new(options_in(&root), None, None);

        let config = assembler.assemble(&BuildContext::new("development", true)).unwrap();
        assert_eq!(config.get("build.emptyOutDir"), Some(&json!(false)));
        assert_eq!(config.get("test.cache"), Some(&json!(false)));
    }

    #[test]
    fn test_entry_globs_replace_defaults() {
        let (_temp, root) = project(&["src/a.ts", "src/a.test.ts", "lib/b.js"]);
        let options = AssembleOptions {
            entry_globs: Some(vec!["src/**/*.ts".to_string(), "!src/**/*.test.ts".to_string(), "lib/*.js".to_string()]),
            ..options_in(&root)
        };

        let config = ConfigAssembler::new(options, None, None).assemble(&BuildContext::default()).unwrap();
        assert_eq!(config.entries(), vec!["src/a.ts", "lib/b.js"]);
    }

    #[test]
    fn test_override_beats_merge_beats_base() {
        let (_temp, root) = project(&["src/index.ts"]);
        let merge = PartialConfig::new()
            .with("build.outDir", json!("lib"))
            .with("build.minify", json!(true))
            .with("test.exclude", json!(["custom/**"]));
        let overrides = PartialConfig::new()
            .with("build.outDir", json!("out"))
            .with("build.lib.name", json!("pkg"));

        let config = ConfigAssembler::new(options_in(&root), Some(merge), Some(overrides))
            .assemble(&BuildContext::default())
            .unwrap();

        assert_eq!(config.out_dir(), Some("out"));
        assert_eq!(config.get("build.minify"), Some(&json!(true)));
        assert_eq!(config.get("build.lib.name"), Some(&json!("pkg")));
        assert_eq!(config.get("build.lib.formats"), Some(&json!(["es"])));
        assert_eq!(config.get("test.exclude"), Some(&json!(["custom/**"])));
    }

    #[test]
    fn test_merge_layer_can_concat_arrays() {
        let (_temp, root) = project(&["src/index.ts"]);
        let options = AssembleOptions {
            merge_arrays: ArrayPolicy::Concat,
            ..options_in(&root)
        };
        let merge = PartialConfig::new()
            .with("test.exclude", json!(["custom/**"]))
            .with_plugins(vec![Arc::new(ExternalizeDeps::new(Some(json!({ "deps": false }))))]);

        let config = ConfigAssembler::new(options, Some(merge), None)
            .assemble(&BuildContext::default())
            .unwrap();

        let exclude = config.get("test.exclude").and_then(Value::as_array).unwrap();
        assert_eq!(exclude.first(), Some(&json!("custom/**")));
        assert_eq!(exclude.last(), Some(&json!(".direnv/**/*")));
        assert_eq!(config.plugins.len(), 3);
    }

    #[test]
    fn test_plugin_options_forwarded() {
        let (_temp, root) = project(&["src/index.ts"]);
        let options = AssembleOptions {
            plugin_opts: PluginOpts {
                types_plugin: TypesPluginOptions {
                    dts_generator: "vue-tsc".to_string(),
                    ..TypesPluginOptions::default()
                },
                externalize_deps: Some(json!({ "except": ["tslib"] })),
            },
            ..options_in(&root)
        };

        let config = ConfigAssembler::new(options, None, None).assemble(&BuildContext::default()).unwrap();
        let rendered = config.to_value();
        assert_eq!(rendered["plugins"][0]["options"], json!({ "except": ["tslib"] }));
        assert_eq!(rendered["plugins"][1]["options"]["dts_generator"], json!("vue-tsc"));
    }

    #[test]
    fn test_assembly_is_repeatable() {
        let (_temp, root) = project(&["src/a.ts", "src/b/c.ts"]);
        let assembler = ConfigAssembler::new(
            options_in(&root),
            Some(PartialConfig::new().with("build.sourcemap", json!(true))),
            None,
        );
        let ctx = BuildContext::new("production", true);

        assert_eq!(assembler.assemble(&ctx).unwrap(), assembler.assemble(&ctx).unwrap());
    }

    #[test]
    fn test_debug_callback_sees_final_config() {
        let (_temp, root) = project(&["src/index.ts"]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = AssembleOptions {
            debug: DebugMode::inspect(move |config| {
                sink.lock().unwrap().push(config.out_dir().unwrap_or_default().to_string());
            }),
            ..options_in(&root)
        };
        let overrides = PartialConfig::new().with("build.outDir", json!("out"));

        ConfigAssembler::new(options, None, Some(overrides))
            .assemble(&BuildContext::default())
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["out".to_string()]);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let (_temp, root) = project(&["src/index.ts"]);
        let overrides = PartialConfig::new().with("build.lib.formats", json!(["amd"]));

        let result = ConfigAssembler::new(options_in(&root), None, Some(overrides)).assemble(&BuildContext::default());
        assert!(matches!(result, Err(StrataError::ConfigValidation { .. })));
    }
}
