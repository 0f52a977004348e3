//! Fake Aleph API server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Every GET is answered from a table of canned responses keyed
//! by request path; unknown paths get a 404. Each request is recorded so
//! tests can assert on the query string and the `Authorization` header.
//!
//! # Example
//!
//! ```rust,no_run
//! # tokio_test::block_on(async {
//! use common::fake_aleph::FakeAleph;
//!
//! let aleph = FakeAleph::start().await.unwrap();
//! aleph.respond_json("/api/2/entities", serde_json::json!({ "results": [] })).await;
//!
//! // Point the client at aleph.base_url()
//! let url = aleph.base_url();
//! # });
//! ```

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    /// Decoded query pairs in wire order, repeated keys included.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let raw = self.query.clone().unwrap_or_default();
        let url = reqwest::Url::parse(&format!("http://localhost/?{}", raw)).unwrap();
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn values_of(&self, key: &str) -> Vec<String> {
        self.query_pairs()
            .into_iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v)
            .collect()
    }
}

#[derive(Default)]
struct ApiState {
    responses: HashMap<String, (StatusCode, String)>,
    requests: Vec<RecordedRequest>,
}

/// Handle to the running fake Aleph server.
pub struct FakeAleph {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeAleph {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new().fallback(respond).with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL the client should be configured with.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/2", self.addr)
    }

    pub async fn respond_json(&self, path: &str, body: serde_json::Value) {
        self.respond_raw(path, StatusCode::OK, body.to_string()).await;
    }

    pub async fn respond_raw(&self, path: &str, status: StatusCode, body: impl Into<String>) {
        let mut state = self.state.lock().await;
        state
            .responses
            .insert(path.to_string(), (status, body.into()));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    pub async fn last_request(&self) -> RecordedRequest {
        self.requests()
            .await
            .pop()
            .expect("fake Aleph received no request")
    }
}

/// Address that refuses connections, for transport failures.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/2", addr)
}

async fn respond(
    State(state): State<Arc<Mutex<ApiState>>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().await;
    state.requests.push(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match state.responses.get(uri.path()) {
        Some((status, body)) => (
            *status,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"status":"error"}"#).into_response(),
    }
}
