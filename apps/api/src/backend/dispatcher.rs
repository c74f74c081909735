//! Request Dispatcher — the single choke point for every backend call.
//!
//! Attaches the bearer credential and content-type declaration, asks for the
//! full representation on POST/PATCH, merges the caller's identity into flat
//! mutating bodies, and normalises the response into `Option<Payload>`.
//!
//! Exactly one network call per [`Dispatcher::dispatch`]; no retries, no
//! caching, no coalescing of identical concurrent calls.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::backend::error::RequestError;
use crate::backend::query::{encode_query, Filter};
use crate::config::BackendConfig;

/// Field under which the authenticated identity travels in mutating bodies.
pub const IDENTITY_FIELD: &str = "username";

const PREFER_HEADER: &str = "prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const API_KEY_HEADER: &str = "apikey";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// POST and PATCH carry identity and ask for the resulting representation.
    pub fn is_mutating_write(self) -> bool {
        matches!(self, Method::Post | Method::Patch)
    }
}

/// Per-call options for [`Dispatcher::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub method: Method,
    pub search_params: Option<Filter>,
    pub body: Option<Value>,
}

impl DispatchOptions {
    pub fn get(filter: Option<Filter>) -> Self {
        DispatchOptions {
            method: Method::Get,
            search_params: filter,
            body: None,
        }
    }

    pub fn post(body: Value) -> Self {
        DispatchOptions {
            method: Method::Post,
            search_params: None,
            body: Some(body),
        }
    }

    pub fn patch(filter: Filter, body: Value) -> Self {
        DispatchOptions {
            method: Method::Patch,
            search_params: Some(filter),
            body: Some(body),
        }
    }

    pub fn delete(filter: Filter) -> Self {
        DispatchOptions {
            method: Method::Delete,
            search_params: Some(filter),
            body: None,
        }
    }
}

/// A decoded success body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Deserializes a JSON payload into `T`. Text payloads are a shape error.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, RequestError> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Text(text) => Err(RequestError::UnexpectedShape(format!(
                "expected JSON, got text: {}",
                crate::backend::error::snippet(&text)
            ))),
        }
    }
}

/// Inserts `username` under [`IDENTITY_FIELD`] when `body` is a JSON object
/// that does not already carry one. Arrays and primitives pass through.
pub fn merge_identity(body: Value, username: &str) -> Value {
    match body {
        Value::Object(mut map) => {
            map.entry(IDENTITY_FIELD)
                .or_insert_with(|| Value::String(username.to_string()));
            Value::Object(map)
        }
        other => other,
    }
}

/// Wire form of a body: strings are assumed to be pre-serialized and are
/// sent as-is, everything else is JSON-encoded.
fn serialize_body(body: &Value) -> Result<String, RequestError> {
    match body {
        Value::String(raw) => Ok(raw.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false)
}

/// The HTTP client every resource client goes through.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    config: Arc<BackendConfig>,
}

impl Dispatcher {
    pub fn new(config: BackendConfig) -> Result<Self, RequestError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: BackendConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    fn url_for(&self, path: &str, filter: Option<&Filter>) -> String {
        format!(
            "{}/{}{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
            encode_query(filter)
        )
    }

    fn headers_for(&self, method: Method) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.access_token))
            .map_err(|_| RequestError::InvalidCredential("access token is not a valid header value"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if method.is_mutating_write() {
            headers.insert(PREFER_HEADER, HeaderValue::from_static(RETURN_REPRESENTATION));
        }
        if let Some(key) = &self.config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| RequestError::InvalidCredential("api key is not a valid header value"))?;
            headers.insert(API_KEY_HEADER, value);
        }
        Ok(headers)
    }

    /// Sends one request and normalises the response.
    ///
    /// - non-success status → [`RequestError::Status`] with the first 200
    ///   characters of the body; the body is never parsed
    /// - empty success body → `Ok(None)`
    /// - JSON content type → `Payload::Json`, anything else → `Payload::Text`
    pub async fn dispatch(
        &self,
        path: &str,
        options: DispatchOptions,
    ) -> Result<Option<Payload>, RequestError> {
        let DispatchOptions {
            method,
            search_params,
            body,
        } = options;

        let url = self.url_for(path, search_params.as_ref());
        let mut request = self
            .client
            .request(method.as_reqwest(), &url)
            .headers(self.headers_for(method)?);

        if let Some(body) = body {
            let body = if method.is_mutating_write() {
                merge_identity(body, &self.config.username)
            } else {
                body
            };
            request = request.body(serialize_body(&body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        debug!(
            method = ?method,
            path,
            status = status.as_u16(),
            bytes = text.len(),
            "backend call finished"
        );

        if !status.is_success() {
            return Err(RequestError::from_failed_body(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        if is_json_content_type(content_type.as_deref()) {
            Ok(Some(Payload::Json(serde_json::from_str(&text)?)))
        } else {
            Ok(Some(Payload::Text(text)))
        }
    }

    /// Dispatches and deserializes a JSON body into `T`. An empty body is a
    /// shape error here; use [`Dispatcher::dispatch`] when `None` is valid.
    pub async fn dispatch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: DispatchOptions,
    ) -> Result<T, RequestError> {
        match self.dispatch(path, options).await? {
            Some(payload) => payload.into_json(),
            None => Err(RequestError::UnexpectedShape(format!(
                "empty response body from {path}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{MockBackend, MockResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_merge_identity_inserts_when_missing() {
        let merged = merge_identity(json!({"title": "Backend"}), "alice");
        assert_eq!(merged, json!({"title": "Backend", "username": "alice"}));
    }

    #[test]
    fn test_merge_identity_never_overwrites() {
        let merged = merge_identity(json!({"username": "bob", "title": "x"}), "alice");
        assert_eq!(merged["username"], "bob");
    }

    #[test]
    fn test_merge_identity_keeps_explicit_null() {
        let merged = merge_identity(json!({"username": null}), "alice");
        assert_eq!(merged["username"], Value::Null);
    }

    #[test]
    fn test_merge_identity_skips_arrays_and_primitives() {
        let rows = json!([{"title": "a"}, {"title": "b"}]);
        assert_eq!(merge_identity(rows.clone(), "alice"), rows);
        assert_eq!(merge_identity(json!(42), "alice"), json!(42));
        assert_eq!(merge_identity(json!("raw"), "alice"), json!("raw"));
    }

    #[test]
    fn test_serialize_body_passes_strings_through() {
        assert_eq!(serialize_body(&json!("{\"a\":1}")).unwrap(), "{\"a\":1}");
        assert_eq!(serialize_body(&json!({"a": 1})).unwrap(), "{\"a\":1}");
        assert_eq!(serialize_body(&json!([1, 2])).unwrap(), "[1,2]");
        assert_eq!(serialize_body(&json!(true)).unwrap(), "true");
    }

    #[test]
    fn test_json_content_type_detection() {
        assert!(is_json_content_type(Some("application/json; charset=utf-8")));
        assert!(is_json_content_type(Some("application/vnd.pgrst.object+json")));
        assert!(!is_json_content_type(Some("text/csv")));
        assert!(!is_json_content_type(None));
    }

    #[tokio::test]
    async fn test_get_sends_auth_and_query_without_body() {
        let backend = MockBackend::start(|_| MockResponse::json(200, json!([{"id": 1}]))).await;
        let dispatcher = backend.dispatcher("alice");

        let filter = Filter::new().eq("status", "Draft").limit(5);
        let payload = dispatcher
            .dispatch("interviews", DispatchOptions::get(Some(filter)))
            .await
            .unwrap();

        assert_eq!(payload, Some(Payload::Json(json!([{"id": 1}]))));

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/rest/v1/interviews");
        assert_eq!(req.query.as_deref(), Some("status=eq.Draft&limit=5"));
        assert_eq!(req.header("authorization").as_deref(), Some("Bearer test-token"));
        assert_eq!(req.header("content-type").as_deref(), Some("application/json"));
        assert_eq!(req.header("prefer"), None);
        assert_eq!(req.body, "");
    }

    #[tokio::test]
    async fn test_post_merges_identity_and_prefers_representation() {
        let backend = MockBackend::start(|req| {
            MockResponse::json(201, serde_json::from_str(&req.body).unwrap())
        })
        .await;
        let dispatcher = backend.dispatcher("alice");

        let payload = dispatcher
            .dispatch("interviews", DispatchOptions::post(json!({"title": "SRE"})))
            .await
            .unwrap();

        assert_eq!(
            payload,
            Some(Payload::Json(json!({"title": "SRE", "username": "alice"})))
        );
        let req = &backend.requests()[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.header("prefer").as_deref(), Some("return=representation"));
    }

    #[tokio::test]
    async fn test_patch_preserves_caller_identity() {
        let backend = MockBackend::start(|_| MockResponse::json(200, json!([]))).await;
        let dispatcher = backend.dispatcher("alice");

        dispatcher
            .dispatch(
                "questions",
                DispatchOptions::patch(
                    Filter::new().eq("id", 3),
                    json!({"question": "Why Rust?", "username": "carol"}),
                ),
            )
            .await
            .unwrap();

        let req = &backend.requests()[0];
        let sent: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(sent["username"], "carol");
        assert_eq!(req.query.as_deref(), Some("id=eq.3"));
        assert_eq!(req.header("prefer").as_deref(), Some("return=representation"));
    }

    #[tokio::test]
    async fn test_bulk_insert_array_is_not_merged() {
        let backend = MockBackend::start(|_| MockResponse::json(201, json!([]))).await;
        let dispatcher = backend.dispatcher("alice");

        dispatcher
            .dispatch("questions", DispatchOptions::post(json!([{"question": "a"}])))
            .await
            .unwrap();

        let sent: Value = serde_json::from_str(&backend.requests()[0].body).unwrap();
        assert_eq!(sent, json!([{"question": "a"}]));
    }

    #[tokio::test]
    async fn test_failure_surfaces_status_and_snippet_without_parsing() {
        let long_body = format!("{{\"message\":\"{}\"}}", "z".repeat(400));
        let backend =
            MockBackend::start(move |_| MockResponse::json_text(409, long_body.clone())).await;
        let dispatcher = backend.dispatcher("alice");

        let err = dispatcher
            .dispatch("interviews", DispatchOptions::post(json!({"title": "x"})))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("409"));
        match err {
            RequestError::Status { status, snippet } => {
                assert_eq!(status, 409);
                assert_eq!(snippet.chars().count(), 200);
                assert!(snippet.starts_with("{\"message\":\"zzz"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_with_invalid_json_body_is_still_status_error() {
        let backend =
            MockBackend::start(|_| MockResponse::json_text(500, "<html>oops".to_string())).await;
        let err = backend
            .dispatcher("alice")
            .dispatch("interviews", DispatchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_empty_body_yields_none() {
        let backend = MockBackend::start(|_| MockResponse::empty(204)).await;
        let result = backend
            .dispatcher("alice")
            .dispatch("interviews", DispatchOptions::delete(Filter::new().eq("id", 1)))
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(backend.requests()[0].method, "DELETE");
    }

    #[tokio::test]
    async fn test_non_json_content_type_returns_text() {
        let backend = MockBackend::start(|_| MockResponse::text(200, "id,title\n1,SRE")).await;
        let result = backend
            .dispatcher("alice")
            .dispatch("interviews", DispatchOptions::default())
            .await
            .unwrap();
        assert_eq!(result, Some(Payload::Text("id,title\n1,SRE".to_string())));
    }

    #[tokio::test]
    async fn test_api_key_header_sent_when_configured() {
        let backend = MockBackend::start(|_| MockResponse::json(200, json!([]))).await;
        let mut config = backend.config("alice");
        config.api_key = Some("anon-key".to_string());
        let dispatcher = Dispatcher::new(config).unwrap();

        dispatcher
            .dispatch("applicants", DispatchOptions::default())
            .await
            .unwrap();

        assert_eq!(
            backend.requests()[0].header("apikey").as_deref(),
            Some("anon-key")
        );
    }

    #[tokio::test]
    async fn test_dispatch_json_rejects_empty_body() {
        let backend = MockBackend::start(|_| MockResponse::empty(200)).await;
        let err = backend
            .dispatcher("alice")
            .dispatch_json::<Vec<Value>>("interviews", DispatchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::UnexpectedShape(_)));
    }

    #[tokio::test]
    async fn test_unsendable_credentials_are_invalid_credential() {
        let backend = MockBackend::start(|_| MockResponse::json(200, json!([]))).await;

        let mut config = backend.config("alice");
        config.access_token = "line\nbreak".to_string();
        let err = Dispatcher::new(config)
            .unwrap()
            .dispatch("interviews", DispatchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::InvalidCredential(_)));

        let mut config = backend.config("alice");
        config.api_key = Some("key\u{7f}".to_string());
        let err = Dispatcher::new(config)
            .unwrap()
            .dispatch("interviews", DispatchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::InvalidCredential(_)));
        assert!(backend.requests().is_empty());
    }
}
