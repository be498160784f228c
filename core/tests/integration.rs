//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test boots the mock server on a random port (std listener handed to
//! a tokio runtime on a background thread, the server's own pattern) and
//! drives the adapter with its production `ureq` transport, so request
//! building, auth headers, chunking, and outcome classification are all
//! validated over real HTTP.

use std::net::SocketAddr;

use api_dataset::{ApiDataset, DatasetError, Method, RequestSpec};
use serde_json::{json, Value};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn dataset_for(url: String) -> ApiDataset {
    let spec = RequestSpec::builder(url).build().unwrap();
    ApiDataset::new(spec)
}

#[test]
fn load_returns_text_body() {
    let addr = start_server();
    let spec = RequestSpec::builder(format!("http://{addr}/api/test"))
        .param("param", "value")
        .header("key", "value")
        .build()
        .unwrap();
    let dataset = ApiDataset::new(spec);

    let response = dataset.load().unwrap();
    assert_eq!(response.text(), mock_server::TEXT_RESPONSE);
}

#[test]
fn load_returns_json_body() {
    let addr = start_server();
    let dataset = dataset_for(format!("http://{addr}/api/json"));

    let response = dataset.load().unwrap();
    let value: Value = response.json().unwrap();
    assert_eq!(value, json!([{"key": "value"}]));
}

#[test]
fn load_succeeds_for_every_method() {
    let addr = start_server();
    for method in Method::ALL {
        let spec = RequestSpec::builder(format!("http://{addr}/api/test"))
            .method(method)
            .build()
            .unwrap();
        let response = ApiDataset::new(spec).load().unwrap();
        assert!(response.is_success(), "method {method}");
        // HEAD responses carry no body by construction.
        if method != Method::Head {
            assert_eq!(response.text(), mock_server::TEXT_RESPONSE, "method {method}");
        }
    }
}

#[test]
fn load_http_error_is_fetch_failed() {
    let addr = start_server();
    let dataset = dataset_for(format!("http://{addr}/status/403"));

    let err = dataset.load().unwrap_err();
    assert!(err.to_string().contains("Failed to fetch data"));
    assert!(matches!(err, DatasetError::FetchFailed { status: 403, .. }));
}

#[test]
fn load_against_closed_port_is_connection_error() {
    // Grab a free port, then close the listener so nothing answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dataset = dataset_for(format!("http://{addr}/api/test"));
    let err = dataset.load().unwrap_err();
    assert!(err.to_string().contains("Failed to connect"));
    assert!(matches!(err, DatasetError::LoadConnection(_)));
}

#[test]
fn exists_reports_presence_and_propagates_errors() {
    let addr = start_server();

    let present = dataset_for(format!("http://{addr}/api/test"));
    assert!(present.exists().unwrap());

    let broken = dataset_for(format!("http://{addr}/status/403"));
    let err = broken.exists().unwrap_err();
    assert!(err.to_string().contains("Failed to fetch data"));
}

#[test]
fn save_chunks_arrive_as_separate_batches() {
    let addr = start_server();
    let spec = RequestSpec::builder(format!("http://{addr}/records"))
        .method(Method::Post)
        .chunk_size(2)
        .build()
        .unwrap();
    let dataset = ApiDataset::new(spec);

    let records: Vec<Value> = (0..5).map(|i| json!({"row": i})).collect();
    let responses = dataset.save(records).unwrap();
    assert_eq!(responses.len(), 3);

    let report = dataset_for(format!("http://{addr}/records")).load().unwrap();
    let report: mock_server::ReceivedBatches = report.json().unwrap();
    assert_eq!(report.batches, 3);
    let record_count: usize = report
        .payloads
        .iter()
        .map(|batch| batch.as_array().unwrap().len())
        .sum();
    assert_eq!(record_count, 5);
}

#[test]
fn save_http_error_is_send_failed() {
    let addr = start_server();
    let spec = RequestSpec::builder(format!("http://{addr}/status/500"))
        .method(Method::Post)
        .build()
        .unwrap();
    let dataset = ApiDataset::new(spec);

    let err = dataset.save(json!({"k": "v"})).unwrap_err();
    assert!(err.to_string().contains("Failed to send data"));
}

#[test]
fn save_against_closed_port_is_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let spec = RequestSpec::builder(format!("http://{addr}/records"))
        .method(Method::Post)
        .build()
        .unwrap();
    let err = ApiDataset::new(spec).save(json!({"k": "v"})).unwrap_err();
    assert!(err
        .to_string()
        .contains("Failed to connect to the remote server"));
    assert!(matches!(err, DatasetError::SaveConnection(_)));
}

#[test]
fn basic_auth_header_reaches_the_server() {
    let addr = start_server();

    let spec = RequestSpec::builder(format!("http://{addr}/protected"))
        .auth(("user", "pass"))
        .build()
        .unwrap();
    let response = ApiDataset::new(spec).load().unwrap();
    assert_eq!(response.text(), mock_server::TEXT_RESPONSE);

    let unauthenticated = dataset_for(format!("http://{addr}/protected"));
    let err = unauthenticated.load().unwrap_err();
    assert!(matches!(err, DatasetError::FetchFailed { status: 401, .. }));
}
