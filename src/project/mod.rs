//! Project files: registry, interaction graphs, test cases, environment
//!
//! A project is a directory laid out as described by the `[paths]` section
//! of `apichain.toml`. Everything a run needs is loaded up front; a missing
//! or malformed file aborts before any request is sent.

pub mod builder;
mod env;
mod graph;
mod registry;
mod testcases;

pub use env::EnvironmentConfig;
pub use graph::{Channel, InteractionEntry, InteractionGraph, InteractionNode};
pub use registry::{ApiRegistry, RequestTemplate};
pub use testcases::{InputValues, ScenarioCases, TestCaseBook};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::common::config::Config;
use crate::common::paths::{self, ENV_API};
use crate::common::{Error, Result};
use crate::results::ResultStore;

/// Read and parse a required JSON file
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| Error::config_invalid(path, e))
}

/// Write a value as pretty JSON, creating parent directories
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    paths::ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Everything needed to run one scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub registry: ApiRegistry,
    pub graph: InteractionGraph,
    pub env: EnvironmentConfig,
    pub cases: ScenarioCases,
}

impl Scenario {
    /// APIs in execution order (interaction file order, without `ENV`)
    pub fn sequence(&self) -> Vec<String> {
        self.graph.sequence()
    }

    /// Check that every API of the sequence has a request template
    pub fn validate(&self) -> Result<()> {
        for api in self.sequence() {
            if !self.registry.contains(&api) {
                return Err(Error::UnknownApi(api));
            }
        }
        Ok(())
    }
}

/// A project directory with its settings
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Open a project, reading `apichain.toml` when present
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry_path(&self) -> PathBuf {
        paths::resolve(&self.root, &self.config.paths.registry)
    }

    pub fn interactions_path(&self, scenario: &str) -> PathBuf {
        paths::resolve(&self.root, &self.config.paths.interactions_dir)
            .join(paths::interactions_file_name(scenario))
    }

    pub fn testcases_path(&self) -> PathBuf {
        paths::resolve(&self.root, &self.config.paths.testcases)
    }

    pub fn environment_path(&self) -> PathBuf {
        paths::resolve(&self.root, &self.config.paths.environment)
    }

    pub fn results_path(&self) -> PathBuf {
        paths::resolve(&self.root, &self.config.paths.results)
    }

    pub fn load_registry(&self) -> Result<ApiRegistry> {
        ApiRegistry::load(&self.registry_path())
    }

    pub fn load_graph(&self, scenario: &str) -> Result<InteractionGraph> {
        InteractionGraph::load(&self.interactions_path(scenario))
    }

    pub fn save_graph(&self, scenario: &str, graph: &InteractionGraph) -> Result<()> {
        graph.save(&self.interactions_path(scenario))
    }

    pub fn open_results(&self) -> Result<ResultStore> {
        ResultStore::open(&self.results_path())
    }

    /// Load and validate all inputs of a scenario
    pub fn load_scenario(&self, name: &str) -> Result<Scenario> {
        let registry = self.load_registry()?;
        let graph = self.load_graph(name)?;
        let env = EnvironmentConfig::load_optional(&self.environment_path())?;
        let book = TestCaseBook::load(&self.testcases_path())?;
        let cases = book.scenario(name)?.clone();

        let scenario = Scenario {
            name: name.to_string(),
            registry,
            graph,
            env,
            cases,
        };
        scenario.validate()?;

        tracing::debug!(
            "Loaded scenario '{}': {} APIs in sequence, ENV node: {}",
            name,
            scenario.sequence().len(),
            scenario.graph.contains(ENV_API)
        );
        Ok(scenario)
    }
}
