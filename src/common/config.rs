//! Configuration file handling
//!
//! Settings are read from `apichain.toml` in the project directory, then
//! from the user-level config file, then fall back to defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::{config_path, PROJECT_CONFIG_FILE};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Locations of the project input and output files
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Project file locations, relative to the project directory
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// API registry (request templates)
    #[serde(default = "default_registry")]
    pub registry: PathBuf,

    /// Directory holding `<scenario>_interactions.json` files
    #[serde(default = "default_interactions_dir")]
    pub interactions_dir: PathBuf,

    /// Test case inputs, keyed by scenario
    #[serde(default = "default_testcases")]
    pub testcases: PathBuf,

    /// Environment variables; optional on disk
    #[serde(default = "default_environment")]
    pub environment: PathBuf,

    /// Durable result store
    #[serde(default = "default_results")]
    pub results: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            interactions_dir: default_interactions_dir(),
            testcases: default_testcases(),
            environment: default_environment(),
            results: default_results(),
        }
    }
}

fn default_registry() -> PathBuf {
    PathBuf::from("configs/api_config.json")
}
fn default_interactions_dir() -> PathBuf {
    PathBuf::from("interactions")
}
fn default_testcases() -> PathBuf {
    PathBuf::from("testcases/testcases.json")
}
fn default_environment() -> PathBuf {
    PathBuf::from("configs/env_config.json")
}
fn default_results() -> PathBuf {
    PathBuf::from("results/results.json")
}

/// HTTP transport settings
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("apichain/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration for a project directory
    ///
    /// Returns default configuration if neither file exists
    pub fn load(project_dir: &Path) -> Result<Self> {
        let project_file = project_dir.join(PROJECT_CONFIG_FILE);
        if project_file.exists() {
            return Self::load_file(&project_file);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
