//! Build interaction graphs from pairwise links
//!
//! A link says "input API consumes these parameters from output API, at this
//! level". Links sharing a level number form one wave; waves are ordered by
//! ascending level number.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::graph::{InteractionEntry, InteractionGraph, InteractionNode};
use crate::common::Result;

/// One dependency between two APIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLink {
    /// API that consumes the values
    pub input: String,
    /// API (or `ENV`) that supplies them
    pub output: String,
    /// 1-based wave number
    pub level: u32,
    #[serde(flatten)]
    pub entry: InteractionEntry,
}

/// File accepted by `graph build`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkSheet {
    /// Extra API names to include even without links
    #[serde(default)]
    pub apis: Vec<String>,
    pub links: Vec<InteractionLink>,
}

impl LinkSheet {
    pub fn load(path: &Path) -> Result<Self> {
        super::read_json(path)
    }
}

/// Build a graph with one node per API
///
/// Node order is `apis` first, then any API only named by a link. Stored
/// responses start empty.
pub fn build_graph<S: AsRef<str>>(apis: &[S], links: &[InteractionLink]) -> InteractionGraph {
    let mut order: Vec<String> = apis.iter().map(|api| api.as_ref().to_string()).collect();
    for link in links {
        for api in [&link.input, &link.output] {
            if !order.contains(api) {
                order.push(api.clone());
            }
        }
    }

    let mut by_input: IndexMap<&str, Vec<&InteractionLink>> = IndexMap::new();
    for link in links {
        by_input.entry(link.input.as_str()).or_default().push(link);
    }

    let mut graph = InteractionGraph::default();
    for api in &order {
        let mut node = InteractionNode::default();

        if let Some(links) = by_input.get(api.as_str()) {
            let mut waves: BTreeMap<u32, Vec<String>> = BTreeMap::new();
            for link in links {
                let wave = waves.entry(link.level).or_default();
                if !wave.contains(&link.output) {
                    wave.push(link.output.clone());
                }

                let entry = node.dependencies.entry(link.output.clone()).or_default();
                for (channel, params) in link.entry.channels() {
                    entry.params_for_mut(channel).extend(params.iter().cloned());
                }
            }
            node.levels = waves.into_values().collect();
        }

        graph.insert(api.clone(), node);
    }
    graph
}

/// Flatten a graph back into links, one per (input, output) pair
///
/// Output APIs that appear in no wave get level 0.
pub fn links_of(graph: &InteractionGraph) -> Vec<InteractionLink> {
    let mut links = Vec::new();
    for (input, node) in graph.nodes() {
        for (output, entry) in &node.dependencies {
            let level = node
                .levels
                .iter()
                .position(|wave| wave.contains(output))
                .map_or(0, |index| index as u32 + 1);
            links.push(InteractionLink {
                input: input.to_string(),
                output: output.clone(),
                level,
                entry: entry.clone(),
            });
        }
    }
    links
}

/// Compact text of an entry, e.g. `H[token] P[eq.id]`
pub fn describe_entry(entry: &InteractionEntry) -> String {
    let parts: Vec<String> = entry
        .channels()
        .map(|(channel, params)| format!("{}[{}]", channel.code(), params.join(", ")))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}
