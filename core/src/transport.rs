//! The HTTP transport seam.
//!
//! # Design
//! `Transport` is the adapter's only I/O boundary: it takes a plain-data
//! `HttpRequest` and either returns the server's answer (any status,
//! including errors) or fails with a `TransportError` when no response was
//! received. Status interpretation stays out of the transport so the
//! classification in `ApiDataset` is the single place outcomes are decided.
//!
//! `UreqTransport` is the production implementation. The agent is built
//! with `http_status_as_error(false)` so 4xx/5xx come back as data rather
//! than `Err`.

use std::fmt;

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Method};

/// Executes one HTTP round trip.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.method {
            Method::Get => call_without_body(self.agent.get(&request.url), request),
            Method::Options => call_without_body(self.agent.options(&request.url), request),
            Method::Head => call_without_body(self.agent.head(&request.url), request),
            Method::Delete => call_without_body(self.agent.delete(&request.url), request),
            Method::Post => call_with_body(self.agent.post(&request.url), request),
            Method::Put => call_with_body(self.agent.put(&request.url), request),
            Method::Patch => call_with_body(self.agent.patch(&request.url), request),
        };

        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Apply query params and headers; valid for either request-builder state.
fn apply_meta<Any>(
    mut builder: RequestBuilder<Any>,
    request: &HttpRequest,
) -> RequestBuilder<Any> {
    for (key, value) in &request.params {
        builder = builder.query(key.as_str(), value.as_str());
    }
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn call_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    let builder = apply_meta(builder, request);
    match &request.body {
        // A JSON payload may ride on any method, GET and HEAD included.
        Some(body) => builder
            .force_send_body()
            .content_type("application/json")
            .send(body.as_bytes()),
        None => builder.call(),
    }
}

fn call_with_body(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<Body>, ureq::Error> {
    let builder = apply_meta(builder, request);
    match &request.body {
        Some(body) => builder
            .content_type("application/json")
            .send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
