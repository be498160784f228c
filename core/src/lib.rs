//! Data-access adapter for REST-style HTTP APIs.
//!
//! # Overview
//! An `ApiDataset` wraps one declarative request — url, method, query
//! params, headers, basic auth, optional JSON payload — and exposes the
//! dataset lifecycle: `load()` fetches the configured endpoint, `save()`
//! pushes data to it (chunked for record sequences), and `exists()` probes
//! it. Each call issues the request and classifies the outcome once:
//! success (2xx), HTTP error (non-2xx), or connection error (no response).
//!
//! # Design
//! - `RequestSpec` is immutable after construction and reused across calls.
//! - I/O goes through the `Transport` trait; `UreqTransport` is the
//!   production implementation and tests script their own.
//! - Requests and responses are plain data (`http` module), so behavior is
//!   testable without a network.
//! - No retries, no caching, no pagination: one call in, one outcome out.

pub mod auth;
pub mod dataset;
pub mod error;
pub mod http;
pub mod transport;

pub use auth::Credentials;
pub use dataset::{ApiDataset, RequestSpec, RequestSpecBuilder, SaveArgs, SaveData};
pub use error::{DatasetError, TransportError};
pub use http::{HttpRequest, HttpResponse, Method};
pub use transport::{Transport, UreqTransport};
