//! Error types for the API dataset adapter.
//!
//! # Design
//! Every call classifies its outcome exactly once: a 2xx response is
//! success, a non-2xx response is an HTTP error carrying the status and
//! body, and a transport failure (no response at all) is a connection
//! error. Load and save keep separate variants for both failure classes
//! because callers and tests match on the message text.
//!
//! The display strings are a compatibility contract: "Failed to fetch
//! data", "Failed to connect", "Failed to send data", and "Failed to
//! connect to the remote server" must survive rewording.

use std::fmt;

/// A transport-level failure: the request never produced a response.
///
/// HTTP error statuses are *not* transport errors — the transport returns
/// those as ordinary `HttpResponse` values.
#[derive(Debug, Clone)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// Errors surfaced by `RequestSpec` construction and `ApiDataset` calls.
#[derive(Debug)]
pub enum DatasetError {
    /// The request specification is invalid, e.g. both `auth` and
    /// `credentials` were supplied, or a credential sequence had the wrong
    /// arity.
    InvalidConfig(String),

    /// The server answered a load/exists request with a non-2xx status.
    FetchFailed { status: u16, body: String },

    /// The server answered a save request with a non-2xx status.
    SendFailed { status: u16, body: String },

    /// A load/exists request never reached the server.
    LoadConnection(TransportError),

    /// A save request never reached the server.
    SaveConnection(TransportError),

    /// The request payload could not be serialized to JSON.
    Serialization(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::InvalidConfig(msg) => write!(f, "invalid request spec: {msg}"),
            DatasetError::FetchFailed { status, body } => {
                write!(f, "Failed to fetch data: HTTP {status}: {body}")
            }
            DatasetError::SendFailed { status, body } => {
                write!(f, "Failed to send data: HTTP {status}: {body}")
            }
            DatasetError::LoadConnection(source) => {
                write!(f, "Failed to connect to the remote server: {source}")
            }
            DatasetError::SaveConnection(source) => {
                write!(f, "Failed to connect to the remote server: {source}")
            }
            DatasetError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::LoadConnection(source) | DatasetError::SaveConnection(source) => {
                Some(source)
            }
            _ => None,
        }
    }
}
