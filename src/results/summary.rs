//! Scenario summary computed from stored results
//!
//! A stored call passes when it has a 2xx status and no error. Failed calls
//! with a status are grouped by status code and by endpoint.

use serde::Serialize;
use std::collections::BTreeMap;

use super::ScenarioResults;
use crate::project::ApiRegistry;

/// Aggregate view of one scenario's results
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub total_apis: usize,
    pub max_cases_per_api: usize,
    pub passed: usize,
    pub failed: usize,
    /// Status code → number of failed calls
    pub error_codes: BTreeMap<u16, usize>,
    pub failed_endpoints: Vec<FailedEndpoint>,
}

/// Failed calls of one endpoint with one status code
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailedEndpoint {
    pub endpoint: String,
    pub status_code: u16,
    /// 1-based iteration keys, in numeric order
    pub iterations: Vec<String>,
}

/// Summarize the results of a scenario
pub fn summarize(scenario: &str, results: &ScenarioResults, registry: &ApiRegistry) -> ScenarioSummary {
    let mut passed = 0;
    let mut failed = 0;
    let mut error_codes = BTreeMap::new();
    let mut by_endpoint: BTreeMap<(String, u16), Vec<String>> = BTreeMap::new();

    for (api, iterations) in results {
        for (key, response) in iterations {
            if response.is_success() {
                passed += 1;
                continue;
            }
            failed += 1;

            let Some(code) = response.status_code else {
                continue;
            };
            *error_codes.entry(code).or_insert(0) += 1;

            let endpoint = registry
                .get(api)
                .map(|template| template.endpoint())
                .filter(|endpoint| !endpoint.is_empty())
                .unwrap_or_else(|| api.clone());
            by_endpoint.entry((endpoint, code)).or_default().push(key.clone());
        }
    }

    let failed_endpoints = by_endpoint
        .into_iter()
        .map(|((endpoint, status_code), mut iterations)| {
            iterations.sort_by_key(|key| (key.parse::<usize>().unwrap_or(usize::MAX), key.clone()));
            FailedEndpoint {
                endpoint,
                status_code,
                iterations,
            }
        })
        .collect();

    ScenarioSummary {
        scenario: scenario.to_string(),
        total_apis: results.len(),
        max_cases_per_api: results.values().map(|cases| cases.len()).max().unwrap_or(0),
        passed,
        failed,
        error_codes,
        failed_endpoints,
    }
}
