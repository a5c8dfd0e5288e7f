//! API registry: request templates keyed by API name

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::common::Result;

/// Request template for one API
///
/// Header, param and body values are either literals or placeholders equal
/// to a parameter name, optionally written as `eq.<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// Base URL, e.g. `https://api.example.com`
    #[serde(rename = "url")]
    pub base_url: String,
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub params: IndexMap<String, String>,
    #[serde(default)]
    pub body: IndexMap<String, Value>,
}

impl RequestTemplate {
    /// Base URL joined with the path
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

/// All request templates of a project, in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiRegistry {
    apis: IndexMap<String, RequestTemplate>,
}

impl ApiRegistry {
    /// Load the registry from its JSON file
    pub fn load(path: &Path) -> Result<Self> {
        super::read_json(path)
    }

    /// Template of an API
    pub fn get(&self, name: &str) -> Option<&RequestTemplate> {
        self.apis.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apis.contains_key(name)
    }

    /// API names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apis.keys().map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, template: RequestTemplate) {
        self.apis.insert(name.into(), template);
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }
}
