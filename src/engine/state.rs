//! Per-iteration working state over an interaction graph
//!
//! The loaded graph is never mutated during a run. Each iteration gets a
//! fresh [`WorkingGraph`] holding one wave cursor per input API and the
//! responses captured so far in that iteration.

use std::collections::HashMap;

use crate::project::InteractionGraph;
use crate::results::CapturedResponse;

/// Working copy of the graph for one iteration
#[derive(Debug)]
pub struct WorkingGraph<'g> {
    graph: &'g InteractionGraph,
    cursors: HashMap<String, usize>,
    responses: HashMap<String, CapturedResponse>,
}

impl<'g> WorkingGraph<'g> {
    /// Fresh state: all waves pending, responses as stored in the graph
    pub fn new(graph: &'g InteractionGraph) -> Self {
        Self {
            graph,
            cursors: HashMap::new(),
            responses: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &'g InteractionGraph {
        self.graph
    }

    fn cursor(&self, api: &str) -> usize {
        self.cursors.get(api).copied().unwrap_or(0)
    }

    /// Take the next pending wave of `api`, if any
    ///
    /// A taken wave is never returned again by this working graph.
    pub fn next_wave(&mut self, api: &str) -> Option<&'g [String]> {
        let wave = self.graph.levels(api).get(self.cursor(api))?;
        *self.cursors.entry(api.to_string()).or_insert(0) += 1;
        Some(wave.as_slice())
    }

    /// Waves of `api` not taken yet
    pub fn pending_waves(&self, api: &str) -> usize {
        self.graph.levels(api).len().saturating_sub(self.cursor(api))
    }

    /// Latest response of `api`: captured in this iteration, else stored
    pub fn response(&self, api: &str) -> Option<&CapturedResponse> {
        self.responses
            .get(api)
            .or_else(|| self.graph.response(api))
    }

    /// Make a response visible to APIs resolved later in this iteration
    pub fn commit(&mut self, api: &str, response: CapturedResponse) {
        self.responses.insert(api.to_string(), response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph() -> InteractionGraph {
        serde_json::from_value(json!({
            "A": {"response": {"token": "stored"}, "level": []},
            "B": {"response": {}, "level": [["A"], ["ENV"]], "A": {"H": ["token"]}}
        }))
        .unwrap()
    }

    #[test]
    fn test_waves_are_taken_once_and_in_order() {
        let graph = graph();
        let mut working = WorkingGraph::new(&graph);

        assert_eq!(working.pending_waves("B"), 2);
        assert_eq!(working.next_wave("B"), Some(&["A".to_string()][..]));
        assert_eq!(working.next_wave("B"), Some(&["ENV".to_string()][..]));
        assert_eq!(working.next_wave("B"), None);
        assert_eq!(working.pending_waves("B"), 0);
        assert_eq!(working.next_wave("A"), None);
    }

    #[test]
    fn test_fresh_working_graph_restores_waves() {
        let graph = graph();
        let mut first = WorkingGraph::new(&graph);
        first.next_wave("B");

        let mut second = WorkingGraph::new(&graph);
        assert_eq!(second.next_wave("B"), Some(&["A".to_string()][..]));
        assert_eq!(graph.levels("B").len(), 2);
    }

    #[test]
    fn test_committed_response_shadows_stored_one() {
        let graph = graph();
        let mut working = WorkingGraph::new(&graph);
        assert_eq!(
            working.response("A").unwrap().body,
            Some(json!({"token": "stored"}))
        );

        working.commit(
            "A",
            CapturedResponse {
                status_code: Some(200),
                body: Some(json!({"token": "fresh"})),
                error: None,
            },
        );
        assert_eq!(
            working.response("A").unwrap().body,
            Some(json!({"token": "fresh"}))
        );
        assert!(working.response("Z").is_none());
    }
}
