//! Project configuration (easel.yaml).
//!
//! Sets where rendered images land, which commands are switched off and
//! which files `easel render` picks up from a directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EaselError, Result};

/// Name of the configuration file looked up by [`Config::discover`].
pub const CONFIG_FILENAME: &str = "easel.yaml";

/// Project configuration loaded from easel.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory for relative `$renderCanvas` paths.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Commands removed at startup, together with their scoped children.
    #[serde(default)]
    pub disable: Vec<String>,

    /// Script file extension used when walking directories.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

fn default_extension() -> String {
    "easel".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            disable: vec![],
            extension: default_extension(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EaselError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from YAML.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| EaselError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Load `dir/easel.yaml`, or defaults when there is none.
    ///
    /// A relative `output` is anchored to `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let mut config = Self::load(&path)?;
        if config.output.is_relative() {
            config.output = dir.join(&config.output);
        }
        Ok(config)
    }

    /// Resolve a render path against the output directory.
    pub fn resolve_output(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output.join(path)
        }
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| EaselError::Config {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }
}
