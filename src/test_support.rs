//! Recording mock backend used by the unit tests.
//!
//! Binds an axum server on `127.0.0.1:0`, records every request it receives
//! and answers with canned responses keyed by method and path.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A request captured by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct MockState {
    responses: HashMap<(String, String), (u16, Value)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[derive(Default)]
pub struct MockBackendBuilder {
    responses: HashMap<(String, String), (u16, Value)>,
}

impl MockBackendBuilder {
    pub fn respond(mut self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.responses
            .insert((method.to_string(), path.to_string()), (status, body));
        self
    }

    pub async fn start(self) -> MockBackend {
        let state = Arc::new(MockState {
            responses: self.responses,
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        MockBackend { addr, state }
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    pub async fn start() -> Self {
        Self::builder().start().await
    }

    /// Origin, e.g. `http://127.0.0.1:40123`
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// API base URL, e.g. `http://127.0.0.1:40123/api`
    pub fn api_base(&self) -> String {
        format!("{}/api", self.origin())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }
}

async fn record(State(state): State<Arc<MockState>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body: body.to_vec(),
    });

    match state.responses.get(&(method, path)) {
        Some((status, body)) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::OK);
            (status, Json(body.clone())).into_response()
        }
        None => Json(json!({"success": true})).into_response(),
    }
}
