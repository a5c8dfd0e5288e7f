//! Interaction graph: per-API dependency waves and injection channels
//!
//! File shape, keyed by input API:
//!
//! ```json
//! {
//!   "GetProfile": {
//!     "response": {},
//!     "level": [["Login"], ["ENV"]],
//!     "Login": {"H": ["token"]},
//!     "ENV": {"P": ["eq.tenant"]}
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

use crate::common::paths::ENV_API;
use crate::common::Result;
use crate::results::CapturedResponse;

/// Where a resolved value is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "H")]
    Header,
    #[serde(rename = "P")]
    Param,
    #[serde(rename = "B")]
    Body,
    /// Environment variables of the `ENV` pseudo-API itself
    #[serde(rename = "FI")]
    EnvSelf,
}

impl Channel {
    /// Short code used in interaction files
    pub fn code(self) -> &'static str {
        match self {
            Channel::Header => "H",
            Channel::Param => "P",
            Channel::Body => "B",
            Channel::EnvSelf => "FI",
        }
    }
}

/// Parameters one output API supplies to one input API, per channel
///
/// Channels are applied in the order they appear in the file. An `FI`
/// list written before `H` rewrites the environment before the header
/// lookup reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionEntry {
    channels: IndexMap<Channel, Vec<String>>,
}

impl InteractionEntry {
    /// Parameter names for a channel
    pub fn params_for(&self, channel: Channel) -> &[String] {
        self.channels.get(&channel).map_or(&[], Vec::as_slice)
    }

    /// Parameter list of a channel, appended after existing channels if new
    pub fn params_for_mut(&mut self, channel: Channel) -> &mut Vec<String> {
        self.channels.entry(channel).or_default()
    }

    /// Non-empty channels in application order
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &[String])> {
        self.channels
            .iter()
            .filter(|(_, params)| !params.is_empty())
            .map(|(channel, params)| (*channel, params.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.channels().next().is_none()
    }
}

/// Graph record of one input API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionNode {
    /// Response consulted by dependents before the API runs in an iteration
    #[serde(default, serialize_with = "serialize_response")]
    pub response: CapturedResponse,
    /// Ordered waves of output APIs to resolve before this API runs
    #[serde(rename = "level", default)]
    pub levels: Vec<Vec<String>>,
    /// Output API → injected parameters
    #[serde(flatten)]
    pub dependencies: IndexMap<String, InteractionEntry>,
}

/// An empty response is written as `{}`
fn serialize_response<S>(
    response: &CapturedResponse,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if *response == CapturedResponse::default() {
        serializer.serialize_map(Some(0))?.end()
    } else {
        response.serialize(serializer)
    }
}

/// Interaction graph of a scenario, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionGraph {
    nodes: IndexMap<String, InteractionNode>,
}

impl InteractionGraph {
    /// Load a scenario's interaction file
    pub fn load(path: &Path) -> Result<Self> {
        super::read_json(path)
    }

    /// Write the graph back to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        super::write_json(path, self)
    }

    pub fn node(&self, api: &str) -> Option<&InteractionNode> {
        self.nodes.get(api)
    }

    pub fn contains(&self, api: &str) -> bool {
        self.nodes.contains_key(api)
    }

    /// Insert or replace a node
    pub fn insert(&mut self, api: impl Into<String>, node: InteractionNode) {
        self.nodes.insert(api.into(), node);
    }

    /// All nodes, including `ENV`
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &InteractionNode)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Execution sequence: node order without the `ENV` pseudo-API
    pub fn sequence(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|api| api.as_str() != ENV_API)
            .cloned()
            .collect()
    }

    /// Waves declared for an input API
    pub fn levels(&self, api: &str) -> &[Vec<String>] {
        self.nodes
            .get(api)
            .map(|node| node.levels.as_slice())
            .unwrap_or_default()
    }

    /// Parameters `output` supplies to `input`
    pub fn entry(&self, input: &str, output: &str) -> Option<&InteractionEntry> {
        self.nodes.get(input)?.dependencies.get(output)
    }

    /// Stored response of an API
    pub fn response(&self, api: &str) -> Option<&CapturedResponse> {
        self.nodes.get(api).map(|node| &node.response)
    }

    /// Store the latest response of an API, creating its node if needed
    pub fn record_response(&mut self, api: &str, response: CapturedResponse) {
        self.nodes.entry(api.to_string()).or_default().response = response;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> InteractionGraph {
        serde_json::from_value(json!({
            "Login": {"response": {}, "level": []},
            "ENV": {"response": {}, "level": []},
            "GetProfile": {
                "response": {"status_code": 200, "body": {"name": "u"}, "error": null},
                "level": [["Login"], ["ENV"]],
                "Login": {"H": ["token"]},
                "ENV": {"P": ["eq.tenant"], "B": ["region"]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_levels_and_entries() {
        let graph = sample();
        assert_eq!(
            graph.levels("GetProfile"),
            &[vec!["Login".to_string()], vec!["ENV".to_string()]]
        );
        assert_eq!(
            graph.entry("GetProfile", "Login").unwrap().params_for(Channel::Header),
            ["token"]
        );

        let env = graph.entry("GetProfile", "ENV").unwrap();
        let channels: Vec<_> = env.channels().map(|(channel, _)| channel).collect();
        assert_eq!(channels, vec![Channel::Param, Channel::Body]);
        assert_eq!(graph.response("GetProfile").unwrap().status_code, Some(200));
    }

    #[test]
    fn test_sequence_skips_env_and_keeps_order() {
        assert_eq!(sample().sequence(), vec!["Login", "GetProfile"]);
    }

    #[test]
    fn test_record_response_creates_missing_node() {
        let mut graph = InteractionGraph::default();
        graph.record_response(
            "Late",
            CapturedResponse {
                status_code: Some(204),
                ..Default::default()
            },
        );
        let node = graph.node("Late").unwrap();
        assert!(node.levels.is_empty());
        assert_eq!(node.response.status_code, Some(204));
    }

    #[test]
    fn test_serialize_round_trip_keeps_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["GetProfile"]["Login"], json!({"H": ["token"]}));
        assert_eq!(value["GetProfile"]["level"][1][0], "ENV");
        assert_eq!(value["Login"]["response"], json!({}));
        assert_eq!(value["GetProfile"]["response"]["status_code"], json!(200));
    }

    #[test]
    fn test_channels_keep_file_order() {
        let entry: InteractionEntry =
            serde_json::from_value(json!({"FI": ["host"], "H": ["token"], "P": []})).unwrap();
        let channels: Vec<_> = entry.channels().map(|(channel, _)| channel).collect();
        assert_eq!(channels, vec![Channel::EnvSelf, Channel::Header]);
        assert_eq!(entry.params_for(Channel::Body), [] as [String; 0]);
    }
}
