//! Environment variables consumed through the `ENV` pseudo-API

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::common::Result;

/// Contents of the environment config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(rename = "ENV_VARIABLES", default)]
    pub variables: IndexMap<String, Value>,
}

impl EnvironmentConfig {
    /// Load the environment file; a missing file means no variables
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No environment file at {}", path.display());
            return Ok(Self::default());
        }
        super::read_json(path)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
