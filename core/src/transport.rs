//! Transport: URL building, JSON framing and status normalization.
//!
//! # Design
//! `Transport` owns the configured base address and an `HttpExecutor`. Request
//! building and response parsing are pure functions; only
//! `HttpExecutor::execute` performs I/O. Every call makes exactly one attempt.
//!
//! Failure mapping:
//! - no response at all (refused, DNS, timeout) -> `Unreachable`
//! - any status outside 200..=299 -> `HttpStatus(code)`, body ignored
//! - 2xx with a body that is not JSON -> `MalformedResponse`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Performs the network round-trip for a fully built request.
///
/// Implementations must return non-2xx responses as data rather than as
/// errors; status interpretation belongs to `Transport`.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production executor backed by a blocking `ureq` agent.
///
/// Each call runs on tokio's blocking pool so awaiting controllers stay
/// responsive while the request is in flight.
#[derive(Clone)]
pub struct UreqExecutor {
    agent: Agent,
}

impl fmt::Debug for UreqExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqExecutor").finish_non_exhaustive()
    }
}

impl UreqExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl HttpExecutor for UreqExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::Unreachable(format!("request task failed: {e}")))?
    }
}

fn execute_blocking(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let result = match method {
        HttpMethod::Get => with_headers(agent.get(&url), &headers).call(),
        HttpMethod::Post => send_body(with_headers(agent.post(&url), &headers), body),
        HttpMethod::Put => send_body(with_headers(agent.put(&url), &headers), body),
    };
    let mut response = result.map_err(|e| TransportError::Unreachable(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::MalformedResponse(format!("unreadable body: {e}")))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// Joins endpoint paths onto a base address and runs them through an
/// executor.
#[derive(Clone)]
pub struct Transport {
    base_url: String,
    executor: Arc<dyn HttpExecutor>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Transport {
    pub fn new(base_url: &str, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            executor,
        }
    }

    /// Transport over a `UreqExecutor` honoring the configured timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, Arc::new(UreqExecutor::new(config.timeout)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (which starts with `/`). A body gets the
    /// JSON content-type header.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }

    /// Execute a built request once. Non-2xx responses come back as data.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.executor.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    /// Build, execute and parse in one step.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<Value, TransportError> {
        let response = self.execute(self.build_request(method, path, body)).await?;
        parse_json(&response)
    }
}

/// Serialize a request payload.
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<String, TransportError> {
    serde_json::to_string(payload).map_err(|e| TransportError::Encode(e.to_string()))
}

/// Map a response to its JSON body, or to the failure it represents.
pub fn parse_json(response: &HttpResponse) -> Result<Value, TransportError> {
    if !response.is_success() {
        return Err(TransportError::HttpStatus(response.status));
    }
    serde_json::from_str(&response.body).map_err(|e| TransportError::MalformedResponse(e.to_string()))
}

/// Decode a whole JSON document into a required record.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| TransportError::MalformedResponse(e.to_string()))
}

/// Decode the list stored under `field`. An absent or null field is an empty
/// list; a present field of the wrong shape is malformed.
pub(crate) fn decode_list<T: DeserializeOwned>(
    mut value: Value,
    field: &str,
) -> Result<Vec<T>, TransportError> {
    match value.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => decode(list),
    }
}
