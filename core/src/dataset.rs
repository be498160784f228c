//! The API dataset adapter: one declarative request, three operations.
//!
//! # Design
//! `RequestSpec` captures everything about the outbound call up front and
//! never changes after `build()`. `ApiDataset` pairs a spec with a
//! `Transport` and exposes `load` / `save` / `exists`, each of which issues
//! the call (or, for chunked save, a sequential series) and classifies the
//! outcome exactly once:
//!
//! ```text
//! issue request -> success (2xx) | http error (non-2xx) | connection error
//! ```
//!
//! There are no retries; every failure is reported to the caller
//! immediately, and a chunked save stops at the first failed chunk.

use serde_json::Value;

use crate::auth::Credentials;
use crate::error::DatasetError;
use crate::http::{HttpRequest, HttpResponse, Method};
use crate::transport::{Transport, UreqTransport};

/// Options applied only to `save` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveArgs {
    /// Overrides the spec's method for save calls when set.
    pub method: Option<Method>,
    /// Records per HTTP call when saving a record sequence. Zero is
    /// treated as one.
    pub chunk_size: usize,
}

impl Default for SaveArgs {
    fn default() -> Self {
        Self {
            method: None,
            chunk_size: 1,
        }
    }
}

/// Immutable description of the adapter's single outbound request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    url: String,
    method: Method,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    auth: Option<Credentials>,
    json: Option<Value>,
    save_args: SaveArgs,
}

impl RequestSpec {
    pub fn builder(url: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder {
            url: url.into(),
            method: Method::Get,
            params: Vec::new(),
            headers: Vec::new(),
            auth: None,
            credentials: None,
            json: None,
            save_args: SaveArgs::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn save_args(&self) -> &SaveArgs {
        &self.save_args
    }
}

/// Builder for `RequestSpec`.
///
/// `auth` and `credentials` are separate slots so the mutually-exclusive
/// case is caught at `build()` rather than silently last-wins.
#[derive(Debug)]
pub struct RequestSpecBuilder {
    url: String,
    method: Method,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    auth: Option<Credentials>,
    credentials: Option<Credentials>,
    json: Option<Value>,
    save_args: SaveArgs,
}

impl RequestSpecBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Explicit basic-auth credentials.
    pub fn auth(mut self, auth: impl Into<Credentials>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Credentials resolved by an external source (a credentials store).
    /// Mutually exclusive with `auth`.
    pub fn credentials(mut self, credentials: impl Into<Credentials>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// JSON payload sent with every request this spec issues.
    pub fn json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn save_args(mut self, save_args: SaveArgs) -> Self {
        self.save_args = save_args;
        self
    }

    pub fn save_method(mut self, method: Method) -> Self {
        self.save_args.method = Some(method);
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.save_args.chunk_size = chunk_size;
        self
    }

    pub fn build(self) -> Result<RequestSpec, DatasetError> {
        if self.auth.is_some() && self.credentials.is_some() {
            return Err(DatasetError::InvalidConfig(
                "Cannot specify both auth and credentials.".to_string(),
            ));
        }
        let auth = self.credentials.or(self.auth);
        Ok(RequestSpec {
            url: self.url,
            method: self.method,
            params: self.params,
            headers: self.headers,
            auth,
            json: self.json,
            save_args: self.save_args,
        })
    }
}

/// Payload accepted by `save`.
#[derive(Debug, Clone)]
pub enum SaveData {
    /// A sequence of records, sent `chunk_size` at a time as JSON arrays.
    Records(Vec<Value>),
    /// A single JSON value, sent in one call.
    Value(Value),
}

impl SaveData {
    /// Interpret raw text: valid JSON is sent as-is, anything else is
    /// wrapped as a JSON string.
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => SaveData::Value(value),
            Err(_) => SaveData::Value(Value::String(text.to_string())),
        }
    }
}

impl From<Vec<Value>> for SaveData {
    fn from(records: Vec<Value>) -> Self {
        SaveData::Records(records)
    }
}

impl From<Value> for SaveData {
    fn from(value: Value) -> Self {
        SaveData::Value(value)
    }
}

/// Data-access adapter over a REST-style endpoint.
///
/// One instance holds one immutable `RequestSpec` and a transport; `load`,
/// `save`, and `exists` may be called any number of times, each issuing a
/// fresh request from the stored spec.
#[derive(Debug, Clone)]
pub struct ApiDataset<T: Transport = UreqTransport> {
    spec: RequestSpec,
    transport: T,
}

impl ApiDataset<UreqTransport> {
    /// Adapter with the production `ureq` transport.
    pub fn new(spec: RequestSpec) -> Self {
        Self::with_transport(spec, UreqTransport::new())
    }
}

impl<T: Transport> ApiDataset<T> {
    pub fn with_transport(spec: RequestSpec, transport: T) -> Self {
        Self { spec, transport }
    }

    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// Issue the configured request and return the response on 2xx.
    pub fn load(&self) -> Result<HttpResponse, DatasetError> {
        let request = self.build_request(self.spec.method, self.spec.json.as_ref())?;
        let response = self
            .transport
            .send(&request)
            .map_err(DatasetError::LoadConnection)?;
        if !response.is_success() {
            return Err(DatasetError::FetchFailed {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    /// Send `data` to the endpoint, one call per chunk for record
    /// sequences. The first failed chunk aborts the rest.
    pub fn save(&self, data: impl Into<SaveData>) -> Result<Vec<HttpResponse>, DatasetError> {
        let method = self.spec.save_args.method.unwrap_or(self.spec.method);
        match data.into() {
            SaveData::Records(records) => {
                let chunk_size = self.spec.save_args.chunk_size.max(1);
                let mut responses = Vec::new();
                for chunk in records.chunks(chunk_size) {
                    let payload = Value::Array(chunk.to_vec());
                    responses.push(self.send_chunk(method, &payload)?);
                }
                Ok(responses)
            }
            SaveData::Value(value) => Ok(vec![self.send_chunk(method, &value)?]),
        }
    }

    /// True iff the configured request answers 2xx. Any other HTTP error
    /// propagates rather than masquerading as absence.
    pub fn exists(&self) -> Result<bool, DatasetError> {
        let response = self.load()?;
        Ok(response.is_success())
    }

    fn send_chunk(&self, method: Method, payload: &Value) -> Result<HttpResponse, DatasetError> {
        let request = self.build_request(method, Some(payload))?;
        let response = self
            .transport
            .send(&request)
            .map_err(DatasetError::SaveConnection)?;
        if !response.is_success() {
            return Err(DatasetError::SendFailed {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    fn build_request(
        &self,
        method: Method,
        json: Option<&Value>,
    ) -> Result<HttpRequest, DatasetError> {
        let body = match json {
            Some(value) => Some(
                serde_json::to_string(value)
                    .map_err(|e| DatasetError::Serialization(e.to_string()))?,
            ),
            None => None,
        };
        let mut headers = self.spec.headers.clone();
        if let Some(creds) = &self.spec.auth {
            headers.push(("Authorization".to_string(), creds.basic_header()));
        }
        Ok(HttpRequest {
            method,
            url: self.spec.url.clone(),
            params: self.spec.params.clone(),
            headers,
            body,
        })
    }
}
