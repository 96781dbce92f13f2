//! Type-declaration emission hook.
//!
//! After the host tool writes the library output, the declaration generator
//! (`tsc` by default) runs once to emit `.d.ts` files into the same output
//! directory. A failed run is fatal to the build: there is no retry and the
//! build never completes with stale declarations.

use async_trait::async_trait;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::process::Stdio;
use strata_core::error::{StrataError, StrataResult};
use strata_core::types::{OutputOptions, Plugin};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Name the declaration hook registers under
pub const TYPES_PLUGIN_NAME: &str = "typesPlugin";

/// Options for the declaration hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypesPluginOptions {
    /// Declaration generator executable
    pub dts_generator: String,
    /// Extra arguments appended verbatim after the default flags
    pub additional_args: Vec<String>,
    /// Source root passed as `--rootDir`. Not detected from the host config.
    pub root_dir: String,
    /// Project file passed with `-p`; empty means none
    pub project: Option<String>,
    /// Skip the default declaration flags
    pub no_flags: bool,
}

impl Default for TypesPluginOptions {
    fn default() -> Self {
        Self {
            dts_generator: "tsc".to_string(),
            additional_args: Vec::new(),
            root_dir: "src".to_string(),
            project: Some("tsconfig.types.json".to_string()),
            no_flags: false,
        }
    }
}

/// Runs the declaration generator after the main output is written
#[derive(Debug, Clone, Default)]
pub struct TypesPlugin {
    settings: TypesPluginOptions,
}

impl TypesPlugin {
    /// Create the hook from its options
    pub fn new(settings: TypesPluginOptions) -> Self {
        Self { settings }
    }

    /// Options this hook was created with
    pub fn settings(&self) -> &TypesPluginOptions {
        &self.settings
    }

    /// Arguments passed to the generator, one token per element
    pub fn command_args(&self, out_dir: &Utf8Path) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(project) = self.settings.project.as_deref().filter(|p| !p.is_empty()) {
            args.push("-p".to_string());
            args.push(project.to_string());
        }

        if !self.settings.no_flags {
            args.extend(
                [
                    "--emitDeclarationOnly",
                    "--declaration",
                    "--declarationMap",
                    "--outDir",
                    out_dir.as_str(),
                    "--rootDir",
                    self.settings.root_dir.as_str(),
                    "--noEmit",
                    "false",
                    "--allowJs",
                    "false",
                    "--skipLibCheck",
                    // keep doc comments in the emitted declarations
                    "--removeComments",
                    "false",
                ]
                .map(String::from),
            );
        }

        args.extend(self.settings.additional_args.iter().cloned());
        args
    }

    /// Run the generator and return its exit code.
    ///
    /// A process that ends without reporting a code (killed by a signal)
    /// counts as `0`.
    pub async fn emit_declarations(&self, output: &OutputOptions) -> StrataResult<i32> {
        let out_dir = output
            .dir
            .as_deref()
            .filter(|dir| !dir.as_str().is_empty())
            .ok_or_else(|| StrataError::invalid("outDir", "outDir is not defined"))?;

        let program = &self.settings.dts_generator;
        let args = self.command_args(out_dir);
        debug!("Running {} {:?}", program, args);

        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| StrataError::ProcessSpawn {
                program: program.clone(),
                source: e,
            })?;

        let status = child
            .wait()
            .await
            .map_err(|e| StrataError::io(format!("Failed to wait for {}", program), e))?;

        match status.code() {
            Some(code) => Ok(code),
            None => {
                warn!("{} was terminated without an exit code; declarations in {} may be incomplete", program, out_dir);
                Ok(0)
            },
        }
    }
}

#[async_trait]
impl Plugin for TypesPlugin {
    fn name(&self) -> &str {
        TYPES_PLUGIN_NAME
    }

    fn options(&self) -> Value {
        serde_json::to_value(&self.settings).unwrap_or(Value::Null)
    }

    async fn write_bundle(&self, output: &OutputOptions) -> StrataResult<()> {
        let code = self.emit_declarations(output).await?;
        if code != 0 {
            return Err(StrataError::DeclarationFailed {
                program: self.settings.dts_generator.clone(),
                code,
            });
        }

        info!("Emitted type declarations with {}", self.settings.dts_generator);
        Ok(())
    }
}
