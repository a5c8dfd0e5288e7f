//! Durable, iteration-indexed result store
//!
//! Layout on disk: scenario → API → 1-based iteration (string key) →
//! `{status_code, body, error}`. Every record is written through to the file
//! immediately, so a run killed halfway still leaves the calls it made.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use super::CapturedResponse;
use crate::common::{paths, Error, Result};

/// Results of one scenario: API → iteration key → response
pub type ScenarioResults = IndexMap<String, IndexMap<String, CapturedResponse>>;

/// Append-only store of captured responses
#[derive(Debug, Default)]
pub struct ResultStore {
    path: Option<PathBuf>,
    results: IndexMap<String, ScenarioResults>,
}

impl ResultStore {
    /// Store that never touches the file system
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, creating it lazily on first record
    ///
    /// A file that is not valid JSON is treated as empty and replaced on the
    /// next write.
    pub fn open(path: &Path) -> Result<Self> {
        let results = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
            match serde_json::from_str(&content) {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(
                        "Result store {} is not valid JSON ({}); starting fresh",
                        path.display(),
                        e
                    );
                    IndexMap::new()
                }
            }
        } else {
            IndexMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            results,
        })
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record the response of `api` at a 0-based iteration and persist it
    pub fn record(
        &mut self,
        scenario: &str,
        api: &str,
        iteration: usize,
        response: &CapturedResponse,
    ) -> Result<()> {
        self.results
            .entry(scenario.to_string())
            .or_default()
            .entry(api.to_string())
            .or_default()
            .insert(iteration_key(iteration), response.clone());
        self.flush()
    }

    /// Write the whole store to its file
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        paths::ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(&self.results)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// All results of a scenario
    pub fn scenario(&self, scenario: &str) -> Option<&ScenarioResults> {
        self.results.get(scenario)
    }

    /// Response of `api` at a 0-based iteration
    pub fn get(&self, scenario: &str, api: &str, iteration: usize) -> Option<&CapturedResponse> {
        self.results
            .get(scenario)?
            .get(api)?
            .get(&iteration_key(iteration))
    }
}

/// Iterations are stored under 1-based string keys
fn iteration_key(iteration: usize) -> String {
    (iteration + 1).to_string()
}
