// run configuration, loadable from TOML
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::Encoding;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub engine: EngineConfig,
    pub artifact: ArtifactConfig,
}

impl CatalogConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interface every catalog type must itself implement, if any.
    pub root_type: Option<String>,
    /// Target fields must be static.
    pub require_static: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { root_type: None, require_static: true }
    }
}

/// What to do with the artifact when the run recorded failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactPolicy {
    /// Any artifact-voiding failure suppresses the artifact.
    #[default]
    AbortOnError,
    /// Write whatever was accepted.
    BestEffort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub output_dir: PathBuf,
    /// Path of the artifact under `output_dir`, without the encoding extension.
    pub resource_stem: PathBuf,
    pub encoding: Encoding,
    /// Retry as plain JSON when a compressed write fails.
    pub fallback_to_plain: bool,
    pub policy: ArtifactPolicy,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("target/generated"),
            resource_stem: PathBuf::from("assets/catalog/catalog"),
            encoding: Encoding::JsonZstd,
            fallback_to_plain: true,
            policy: ArtifactPolicy::AbortOnError,
        }
    }
}
