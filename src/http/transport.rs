//! Transport trait and its reqwest implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

use super::RawResponse;
use crate::common::config::HttpConfig;
use crate::common::{Error, Result};
use crate::project::RequestTemplate;

/// Sends one concrete request
///
/// `Err` means no response was obtained at all. Any HTTP status, including
/// 4xx and 5xx, is an `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestTemplate) -> Result<RawResponse>;
}

/// Transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client from the `[http]` settings
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestTemplate) -> Result<RawResponse> {
        let method = reqwest::Method::from_bytes(request.method.trim().to_uppercase().as_bytes())
            .map_err(|_| Error::Transport(format!("Invalid HTTP method '{}'", request.method)))?;
        let url = request.endpoint();

        let mut builder = self
            .client
            .request(method, &url)
            .headers(header_map(request)?);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if !request.body.is_empty() {
            builder = builder.json(&request.body);
        }

        tracing::debug!("{} {}", request.method, url);
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Error calling {}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response from {}: {}", url, e)))?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(String::from),
            body: body.to_vec(),
        })
    }
}

fn header_map(request: &RequestTemplate) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (key, value) in &request.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::Transport(format!("Invalid header name `{}`: {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Transport(format!("Invalid value for header `{}`: {}", key, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
