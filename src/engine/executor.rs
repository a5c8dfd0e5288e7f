//! Sequence executor
//!
//! Runs a scenario iteration by iteration. Within an iteration every API of
//! the sequence is resolved, sent and recorded strictly in order, so later
//! APIs see the responses of earlier ones. A failing call never stops the
//! run; only result store I/O errors do.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::observer::{NoopObserver, RunObserver};
use super::resolver::resolve;
use super::state::WorkingGraph;
use crate::common::paths::ENV_API;
use crate::common::{CallFailure, Error, Result};
use crate::http::Transport;
use crate::project::{InputValues, InteractionGraph, Scenario};
use crate::results::{CapturedResponse, ResultStore};

/// Pass count of one API after a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiTally {
    pub api: String,
    /// Calls that returned a non-empty payload
    pub passed: usize,
    /// Test cases declared for the API
    pub total: usize,
}

impl ApiTally {
    pub fn failed(&self) -> usize {
        self.total.saturating_sub(self.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Outcome of a scenario run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub scenario: String,
    pub iterations: usize,
    /// One entry per API, in sequence order
    pub tallies: Vec<ApiTally>,
    /// Loaded graph with each API's latest captured response
    ///
    /// For display and reporting. Stored responses are seeds for the next
    /// run, so this is not meant to be written back as the interaction file.
    pub final_state: InteractionGraph,
}

impl RunReport {
    pub fn tally(&self, api: &str) -> Option<&ApiTally> {
        self.tallies.iter().find(|tally| tally.api == api)
    }

    pub fn all_passed(&self) -> bool {
        self.tallies.iter().all(ApiTally::all_passed)
    }
}

/// Drives the calls of a scenario through a transport
pub struct SequenceExecutor<'a> {
    transport: &'a dyn Transport,
    store: &'a mut ResultStore,
    observer: Box<dyn RunObserver + 'a>,
}

impl<'a> SequenceExecutor<'a> {
    pub fn new(transport: &'a dyn Transport, store: &'a mut ResultStore) -> Self {
        Self {
            transport,
            store,
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: impl RunObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Run every iteration of a scenario
    pub async fn run(&mut self, scenario: &Scenario) -> Result<RunReport> {
        scenario.validate()?;

        let sequence = scenario.sequence();
        let iterations = scenario.cases.iteration_count(sequence.as_slice());
        let mut passed = vec![0usize; sequence.len()];
        let mut final_state = scenario.graph.clone();
        let no_inputs = InputValues::new();

        info!(
            "Scenario '{}': {} APIs, {} iterations",
            scenario.name,
            sequence.len(),
            iterations
        );

        for iteration in 0..iterations {
            info!("Iteration {}/{}", iteration + 1, iterations);
            self.observer.on_iteration_start(iteration, iterations);

            let mut working = WorkingGraph::new(&scenario.graph);
            let mut env = scenario.env.clone();

            if working.pending_waves(ENV_API) > 0 {
                resolve(ENV_API, &scenario.registry, &mut working, &mut env, &no_inputs)?;
            }

            for (index, api) in sequence.iter().enumerate() {
                let Some(inputs) = scenario.cases.input(api, iteration) else {
                    let reason = CallFailure::MissingTestCase {
                        api: api.clone(),
                        iteration,
                    };
                    warn!("{}, skipping", reason);
                    self.observer.on_skip(api, &reason);
                    continue;
                };

                info!("Executing {} testcase {}", api, iteration + 1);
                self.observer.on_progress(api, iteration, iterations);

                let request = resolve(api, &scenario.registry, &mut working, &mut env, inputs)?
                    .ok_or_else(|| Error::Internal(format!("No request resolved for {}", api)))?;
                debug!("{} -> {} {}", api, request.method, request.endpoint());

                let (response, counted) = match self.transport.send(&request).await {
                    Ok(raw) => (CapturedResponse::from_raw(&raw), raw.has_payload()),
                    Err(e) => {
                        warn!("{}: {}", api, e);
                        (CapturedResponse::no_response(e.to_string()), false)
                    }
                };
                if counted {
                    passed[index] += 1;
                }

                self.store.record(&scenario.name, api, iteration, &response)?;
                working.commit(api, response.clone());
                final_state.record_response(api, response.clone());
                self.observer.on_response(api, iteration, &response, counted);
            }
        }

        let tallies: Vec<ApiTally> = sequence
            .iter()
            .zip(passed)
            .map(|(api, passed)| ApiTally {
                api: api.clone(),
                passed,
                total: scenario.cases.total(api),
            })
            .collect();

        for tally in &tallies {
            info!("{}: Passed {}/{}", tally.api, tally.passed, tally.total);
        }

        let report = RunReport {
            scenario: scenario.name.clone(),
            iterations,
            tallies,
            final_state,
        };
        self.observer.on_finished(&report);
        Ok(report)
    }
}
