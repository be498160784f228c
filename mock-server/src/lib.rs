//! Stub API server for exercising the dataset adapter over real HTTP.
//!
//! Routes are sized to the adapter's contract: a fixed text endpoint, a
//! fixed JSON endpoint, a status-echo endpoint for HTTP-error paths, a
//! record sink that counts received batches, and a basic-auth-protected
//! endpoint. The text/JSON/status routes answer any method so every
//! supported verb can be driven against them.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Body served by the text and protected endpoints.
pub const TEXT_RESPONSE: &str = "This is a response.";

/// Body served with every echoed error status.
pub const ERROR_BODY: &str = "Nope, not found";

/// `Authorization` value accepted by `/protected` ("user" / "pass").
pub const PROTECTED_AUTH: &str = "Basic dXNlcjpwYXNz";

/// JSON batches received on `/records`, in arrival order.
pub type Db = Arc<RwLock<Vec<Value>>>;

/// Report returned by `GET /records`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReceivedBatches {
    pub batches: usize,
    pub payloads: Vec<Value>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/test", any(text_endpoint))
        .route("/api/json", any(json_endpoint))
        .route("/status/{code}", any(echo_status))
        .route("/records", get(report_records).post(append_records))
        .route("/protected", get(protected))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn text_endpoint() -> &'static str {
    TEXT_RESPONSE
}

async fn json_endpoint() -> Json<Value> {
    Json(json!([{"key": "value"}]))
}

async fn echo_status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, ERROR_BODY).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "not an HTTP status code").into_response(),
    }
}

async fn append_records(State(db): State<Db>, Json(payload): Json<Value>) -> StatusCode {
    db.write().await.push(payload);
    StatusCode::CREATED
}

async fn report_records(State(db): State<Db>) -> Json<ReceivedBatches> {
    let payloads = db.read().await.clone();
    Json(ReceivedBatches {
        batches: payloads.len(),
        payloads,
    })
}

async fn protected(headers: HeaderMap) -> Result<&'static str, StatusCode> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(PROTECTED_AUTH);
    if authorized {
        Ok(TEXT_RESPONSE)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_batches_serializes_to_json() {
        let report = ReceivedBatches {
            batches: 2,
            payloads: vec![json!([1, 2]), json!([3])],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["batches"], 2);
        assert_eq!(value["payloads"][0], json!([1, 2]));
    }

    #[test]
    fn received_batches_roundtrips_through_json() {
        let report = ReceivedBatches {
            batches: 1,
            payloads: vec![json!({"row": 0})],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ReceivedBatches = serde_json::from_str(&json).unwrap();
        assert_eq!(back.batches, 1);
        assert_eq!(back.payloads, report.payloads);
    }
}
