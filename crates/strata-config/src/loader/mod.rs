//! Configuration file discovery and layer loading

use camino::{Utf8Path, Utf8PathBuf};
use strata_core::error::StrataError;
use strata_core::types::PartialConfig;
use tracing::debug;

use crate::assemble::AssembleOptions;
use crate::toml::{load_from_file, StrataToml};
use crate::ConfigResult;

/// Name of the options file
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Where the assembly options came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A strata.toml file
    File(Utf8PathBuf),
    /// No file found; built-in defaults
    Defaults,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Working directory entries are resolved against
    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Load assembly options from the nearest strata.toml, or defaults
    pub async fn load_options(&self) -> ConfigResult<(AssembleOptions, ConfigSource)> {
        match self.find_config_file() {
            Some(path) => {
                debug!("Loading options from {}", path);
                let file = load_from_file(&path).await?;
                Ok((file.into_options(self.cwd.clone()), ConfigSource::File(path)))
            },
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                let options = StrataToml::default().into_options(self.cwd.clone());
                Ok((options, ConfigSource::Defaults))
            },
        }
    }

    /// Find strata.toml in the working directory or its ancestors
    pub fn find_config_file(&self) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }

    /// Load a JSON configuration layer, relative paths resolved against the working directory
    pub async fn load_layer(&self, path: &Utf8Path) -> ConfigResult<PartialConfig> {
        let path = self.cwd.join(path);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StrataError::io(format!("Failed to read {}", path), e))?;

        PartialConfig::from_json_str(&content).map_err(|e| match e {
            StrataError::JsonParse { message } => StrataError::JsonParse {
                message: format!("in file {}: {}", path, message),
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ArrayPolicy;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        (temp_dir, root)
    }

    #[tokio::test]
    async fn test_defaults_without_file() {
        let (_temp, root) = temp_root();
        let loader = ConfigLoader::new(root.clone());

        let (options, source) = loader.load_options().await.unwrap();
        // A strata.toml above the temp dir would be picked up; none is expected there
        if source == ConfigSource::Defaults {
            assert!(options.entry_globs.is_none());
        }
        assert_eq!(options.cwd, Some(root));
    }

    #[tokio::test]
    async fn test_finds_file_in_parent() {
        let (_temp, root) = temp_root();
        tokio::fs::write(root.join(CONFIG_FILE_NAME), "merge_arrays = \"concat\"\n")
            .await
            .unwrap();
        let nested = root.join("packages/lib");
        tokio::fs::create_dir_all(&nested).await.unwrap();

        let loader = ConfigLoader::new(nested.clone());
        let (options, source) = loader.load_options().await.unwrap();

        assert_eq!(source, ConfigSource::File(root.join(CONFIG_FILE_NAME)));
        assert_eq!(options.merge_arrays, ArrayPolicy::Concat);
        // Entries still resolve from the working directory
        assert_eq!(options.cwd, Some(nested));
    }

    #[tokio::test]
    async fn test_invalid_file_reports_path() {
        let (_temp, root) = temp_root();
        tokio::fs::write(root.join(CONFIG_FILE_NAME), "debug = \"loud\"\n").await.unwrap();

        let err = ConfigLoader::new(root).load_options().await.unwrap_err();
        match err {
            StrataError::TomlParse { message, .. } => assert!(message.contains(CONFIG_FILE_NAME)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_load_layer() {
        let (_temp, root) = temp_root();
        tokio::fs::write(root.join("override.json"), r#"{ "build": { "outDir": "lib" } }"#)
            .await
            .unwrap();

        let loader = ConfigLoader::new(root);
        let layer = loader.load_layer(Utf8Path::new("override.json")).await.unwrap();
        assert_eq!(layer.values["build"], json!({ "outDir": "lib" }));

        let err = loader.load_layer(Utf8Path::new("missing.json")).await.unwrap_err();
        assert!(matches!(err, StrataError::Io { .. }));
    }
}
