//! In-process mock backend for dispatcher and client tests.
//!
//! Binds an axum server to `127.0.0.1:0`, records every request it sees and
//! answers through a caller-supplied responder.

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    Router,
};
use serde_json::Value;

use crate::backend::dispatcher::Dispatcher;
use crate::config::BackendConfig;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self::json_text(status, body.to_string())
    }

    pub fn json_text(status: u16, body: String) -> Self {
        MockResponse {
            status,
            content_type: Some("application/json; charset=utf-8"),
            body,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        MockResponse {
            status,
            content_type: Some("text/csv"),
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        MockResponse {
            status,
            content_type: None,
            body: String::new(),
        }
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

pub struct MockBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockBackend {
            base_url: format!("http://{addr}/rest/v1"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn config(&self, username: &str) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            access_token: "test-token".to_string(),
            username: username.to_string(),
            api_key: None,
        }
    }

    pub fn dispatcher(&self, username: &str) -> Dispatcher {
        Dispatcher::new(self.config(username)).unwrap()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    let reply = (state.responder)(&recorded);
    state.requests.lock().unwrap().push(recorded);

    let mut builder = axum::http::Response::builder().status(reply.status);
    if let Some(content_type) = reply.content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(Body::from(reply.body)).unwrap()
}
