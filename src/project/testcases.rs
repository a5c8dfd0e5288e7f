//! Test case inputs: scenario → API → one input map per iteration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::common::{Error, Result};

/// Placeholder name → value for one API at one iteration
pub type InputValues = IndexMap<String, Value>;

/// Inputs of one scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCases {
    cases: IndexMap<String, Vec<InputValues>>,
}

impl ScenarioCases {
    /// Input values of `api` at a 0-based iteration, if declared
    pub fn input(&self, api: &str, iteration: usize) -> Option<&InputValues> {
        self.cases.get(api)?.get(iteration)
    }

    /// Number of test cases declared for an API
    pub fn total(&self, api: &str) -> usize {
        self.cases.get(api).map_or(0, Vec::len)
    }

    /// Iterations needed to cover every API of the sequence
    pub fn iteration_count<S: AsRef<str>>(&self, sequence: &[S]) -> usize {
        sequence
            .iter()
            .map(|api| self.total(api.as_ref()))
            .max()
            .unwrap_or(0)
    }

    pub fn insert(&mut self, api: impl Into<String>, inputs: Vec<InputValues>) {
        self.cases.insert(api.into(), inputs);
    }
}

/// Contents of the test case file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestCaseBook {
    scenarios: IndexMap<String, ScenarioCases>,
}

impl TestCaseBook {
    pub fn load(path: &Path) -> Result<Self> {
        super::read_json(path)
    }

    /// Inputs of a scenario
    pub fn scenario(&self, name: &str) -> Result<&ScenarioCases> {
        self.scenarios
            .get(name)
            .ok_or_else(|| Error::ScenarioNotFound(name.to_string()))
    }
}
