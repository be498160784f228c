//! Plain-data HTTP request and response types.
//!
//! # Design
//! The adapter describes the single outbound call as data — method, url,
//! query params, headers, optional JSON body — and the transport layer turns
//! it into wire I/O. Keeping these types free of client-library specifics
//! lets unit tests script a transport without touching the network.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded
//! and compared in tests without lifetime concerns.

use std::fmt;
use std::str::FromStr;

use crate::error::DatasetError;

/// HTTP method for a request. These are the seven verbs the adapter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Options,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Options,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "OPTIONS" => Ok(Method::Options),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(DatasetError::InvalidConfig(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ApiDataset` from its immutable `RequestSpec`; the configured
/// `Transport` executes it. Basic auth is already materialized into the
/// `headers` list by the time a request reaches the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON payload, pre-serialized. Sent as `application/json`.
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Returned by the transport whenever the server answered at all — error
/// statuses are data here, not transport failures. Status interpretation
/// belongs to `ApiDataset`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True iff the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The response body as text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
