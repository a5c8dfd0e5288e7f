//! Dependency resolution: turn a request template into a concrete request
//!
//! Resolution of one API happens in two passes:
//! 1. Wave pass. The next pending wave of the API is taken from the working
//!    graph. For every output API in it, each declared parameter is looked up
//!    (environment variables for `ENV`, otherwise a nested key search in the
//!    output API's latest response body) and written into the first matching
//!    placeholder of its channel.
//! 2. Input pass. The iteration's test case values are written into headers,
//!    then params, then body.
//!
//! Values that are absent, null or empty leave the placeholder untouched.

use tracing::debug;

use super::lookup::{find_nested, is_present};
use super::state::WorkingGraph;
use super::substitute::{strip_marker, substitute, substitute_json};
use crate::common::paths::ENV_API;
use crate::common::{Error, Result};
use crate::project::{ApiRegistry, Channel, EnvironmentConfig, InputValues, RequestTemplate};

/// Channels touched by test case inputs, in application order
const INPUT_CHANNELS: [Channel; 3] = [Channel::Header, Channel::Param, Channel::Body];

/// Resolve the request for `api`
///
/// Advances the API's wave cursor in `working` by at most one wave. For the
/// `ENV` pseudo-API no request is produced (`Ok(None)`); its `FI` entries
/// rewrite `env` in place.
pub fn resolve(
    api: &str,
    registry: &ApiRegistry,
    working: &mut WorkingGraph<'_>,
    env: &mut EnvironmentConfig,
    inputs: &InputValues,
) -> Result<Option<RequestTemplate>> {
    let mut request = if api == ENV_API {
        None
    } else {
        let template = registry
            .get(api)
            .ok_or_else(|| Error::UnknownApi(api.to_string()))?;
        Some(template.clone())
    };

    if let Some(wave) = working.next_wave(api) {
        debug!("{}: resolving wave {:?}", api, wave);
        let graph = working.graph();

        for output in wave {
            let Some(entry) = graph.entry(api, output) else {
                debug!("{}: no interaction entry for {}, skipping", api, output);
                continue;
            };

            for (channel, params) in entry.channels() {
                for param in params {
                    let (name, marker) = strip_marker(param);

                    let value = if output == ENV_API {
                        env.get(name).cloned()
                    } else {
                        working
                            .response(output)
                            .and_then(|response| response.body.as_ref())
                            .and_then(|body| find_nested(body, name))
                            .cloned()
                    };
                    let Some(value) = value.filter(is_present) else {
                        debug!("{}: no value for '{}' from {}", api, name, output);
                        continue;
                    };

                    let written = match (channel, request.as_mut()) {
                        (Channel::EnvSelf, _) => {
                            substitute_json(&mut env.variables, name, &value, marker)
                        }
                        (_, Some(request)) => substitute(request, channel, name, &value, marker),
                        (_, None) => None,
                    };
                    match written {
                        Some(field) => debug!(
                            "{}: {}.{} <- '{}' from {}",
                            api,
                            channel.code(),
                            field,
                            name,
                            output
                        ),
                        None => debug!(
                            "{}: no {} placeholder for '{}'",
                            api,
                            channel.code(),
                            name
                        ),
                    }
                }
            }
        }
    }

    if let Some(request) = request.as_mut() {
        apply_inputs(request, inputs);
    }

    Ok(request)
}

/// Write test case values into matching placeholders
///
/// The `eq.` marker is kept only when the matched field carried it.
pub fn apply_inputs(request: &mut RequestTemplate, inputs: &InputValues) {
    for channel in INPUT_CHANNELS {
        for (key, value) in inputs {
            substitute(request, channel, key, value, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::InteractionGraph;
    use crate::results::CapturedResponse;
    use serde_json::json;

    fn registry() -> ApiRegistry {
        serde_json::from_value(json!({
            "Login": {
                "url": "http://x", "method": "POST", "path": "/login",
                "headers": {}, "body": {"user": "u", "pass": "p"}
            },
            "GetProfile": {
                "url": "http://x", "method": "GET", "path": "/me",
                "headers": {"Authorization": "token"}, "body": {}
            },
            "ListOrders": {
                "url": "http://x", "method": "GET", "path": "/orders",
                "headers": {"X-Tenant": "tenant"},
                "params": {"id": "eq.userId", "status": "status"},
                "body": {}
            }
        }))
        .unwrap()
    }

    fn captured(body: serde_json::Value) -> CapturedResponse {
        CapturedResponse {
            status_code: Some(200),
            body: Some(body),
            error: None,
        }
    }

    #[test]
    fn test_header_from_previous_response() {
        let graph: InteractionGraph = serde_json::from_value(json!({
            "Login": {"response": {}, "level": []},
            "GetProfile": {"response": {}, "level": [["Login"]], "Login": {"H": ["token"]}}
        }))
        .unwrap();
        let mut working = WorkingGraph::new(&graph);
        working.commit("Login", captured(json!({"token": "abc123"})));

        let request = resolve(
            "GetProfile",
            &registry(),
            &mut working,
            &mut EnvironmentConfig::default(),
            &InputValues::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(request.headers["Authorization"], "abc123");
    }

    #[test]
    fn test_eq_marker_round_trip_and_env_source() {
        let graph: InteractionGraph = serde_json::from_value(json!({
            "Login": {"response": {}, "level": []},
            "ListOrders": {
                "response": {}, "level": [["Login", "ENV"]],
                "Login": {"P": ["userId"]},
                "ENV": {"H": ["tenant"]}
            }
        }))
        .unwrap();
        let mut working = WorkingGraph::new(&graph);
        working.commit("Login", captured(json!({"data": {"userId": "42"}})));
        let mut env: EnvironmentConfig =
            serde_json::from_value(json!({"ENV_VARIABLES": {"tenant": "acme"}})).unwrap();

        let request = resolve(
            "ListOrders",
            &registry(),
            &mut working,
            &mut env,
            &InputValues::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(request.params["id"], "eq.42");
        assert_eq!(request.headers["X-Tenant"], "acme");
        assert_eq!(request.params["status"], "status");
    }

    #[test]
    fn test_absent_value_leaves_placeholder() {
        let graph: InteractionGraph = serde_json::from_value(json!({
            "Login": {"response": {}, "level": []},
            "GetProfile": {"response": {}, "level": [["Login"]], "Login": {"H": ["token"]}}
        }))
        .unwrap();
        let mut working = WorkingGraph::new(&graph);
        working.commit("Login", captured(json!({"token": ""})));

        let request = resolve(
            "GetProfile",
            &registry(),
            &mut working,
            &mut EnvironmentConfig::default(),
            &InputValues::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(request.headers["Authorization"], "token");
        assert_eq!(working.pending_waves("GetProfile"), 0);
    }

    #[test]
    fn test_each_call_takes_one_wave() {
        let graph: InteractionGraph = serde_json::from_value(json!({
            "Login": {"response": {"token": "first"}, "level": []},
            "ENV": {"response": {}, "level": []},
            "GetProfile": {
                "response": {}, "level": [["ENV"], ["Login"]],
                "Login": {"H": ["token"]}
            }
        }))
        .unwrap();
        let registry = registry();
        let mut env = EnvironmentConfig::default();
        let mut working = WorkingGraph::new(&graph);

        let first = resolve("GetProfile", &registry, &mut working, &mut env, &InputValues::new())
            .unwrap()
            .unwrap();
        assert_eq!(first.headers["Authorization"], "token");

        let second = resolve("GetProfile", &registry, &mut working, &mut env, &InputValues::new())
            .unwrap()
            .unwrap();
        assert_eq!(second.headers["Authorization"], "first");

        let third = resolve("GetProfile", &registry, &mut working, &mut env, &InputValues::new())
            .unwrap()
            .unwrap();
        assert_eq!(third.headers["Authorization"], "token");
    }

    #[test]
    fn test_inputs_apply_after_waves_in_channel_order() {
        let graph = InteractionGraph::default();
        let mut working = WorkingGraph::new(&graph);
        let inputs: InputValues =
            serde_json::from_value(json!({"user": "alice", "pass": "secret", "userId": 9}))
                .unwrap();

        let login = resolve("Login", &registry(), &mut working, &mut EnvironmentConfig::default(), &inputs)
            .unwrap()
            .unwrap();
        assert_eq!(login.body["user"], json!("alice"));
        assert_eq!(login.body["pass"], json!("secret"));

        let orders = resolve(
            "ListOrders",
            &registry(),
            &mut working,
            &mut EnvironmentConfig::default(),
            &inputs,
        )
        .unwrap()
        .unwrap();
        assert_eq!(orders.params["id"], "eq.9");
    }

    #[test]
    fn test_registry_template_is_not_mutated() {
        let registry = registry();
        let graph = InteractionGraph::default();
        let mut working = WorkingGraph::new(&graph);
        let inputs: InputValues = serde_json::from_value(json!({"user": "alice"})).unwrap();

        resolve("Login", &registry, &mut working, &mut EnvironmentConfig::default(), &inputs).unwrap();
        assert_eq!(registry.get("Login").unwrap().body["user"], json!("u"));
    }

    #[test]
    fn test_env_pseudo_api_rewrites_variables() {
        let graph: InteractionGraph = serde_json::from_value(json!({
            "ENV": {"response": {}, "level": [["ENV"]], "ENV": {"FI": ["base_host"]}}
        }))
        .unwrap();
        let mut working = WorkingGraph::new(&graph);
        let mut env: EnvironmentConfig = serde_json::from_value(json!({
            "ENV_VARIABLES": {"base_host": "api.acme.io", "api_url": "base_host"}
        }))
        .unwrap();

        let request =
            resolve("ENV", &registry(), &mut working, &mut env, &InputValues::new()).unwrap();
        assert!(request.is_none());
        assert_eq!(env.get("api_url").unwrap(), "api.acme.io");
    }

    #[test]
    fn test_env_channels_apply_in_file_order() {
        let graph: InteractionGraph = serde_json::from_value(json!({
            "ListOrders": {
                "response": {},
                "level": [["ENV"]],
                "ENV": {"FI": ["acme"], "H": ["tenant"]}
            }
        }))
        .unwrap();
        let mut working = WorkingGraph::new(&graph);
        let mut env: EnvironmentConfig = serde_json::from_value(json!({
            "ENV_VARIABLES": {"acme": "t-42", "tenant": "acme"}
        }))
        .unwrap();

        let request = resolve(
            "ListOrders",
            &registry(),
            &mut working,
            &mut env,
            &InputValues::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(env.get("tenant").unwrap(), "t-42");
        assert_eq!(request.headers["X-Tenant"], "t-42");
    }

    #[test]
    fn test_unknown_api_is_an_error() {
        let graph = InteractionGraph::default();
        let mut working = WorkingGraph::new(&graph);
        let err = resolve(
            "Nope",
            &registry(),
            &mut working,
            &mut EnvironmentConfig::default(),
            &InputValues::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownApi(api) if api == "Nope"));
    }
}
