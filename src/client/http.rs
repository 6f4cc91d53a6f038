//! HTTP Transport
//!
//! Single configured transport for every backend call. Holds the base URL
//! and the default JSON content type; no retry, no timeout, no caching.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::error::{ClientError, ClientResult};

/// Default backend API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Ordered query parameters, forwarded verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, keeping insertion order
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// A request to be issued against the API base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    query: QueryParams,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Attach query parameters
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A successful backend response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body; `Null` when empty, a JSON string when not JSON
    pub data: serde_json::Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed value
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_value(self.data.clone()).map_err(ClientError::Decode)
    }

    pub fn into_data(self) -> serde_json::Value {
        self.data
    }
}

/// Backend HTTP client
///
/// Cheap to clone; all clones share the connection pool and the immutable
/// base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Arc<str>,
}

impl HttpClient {
    /// Create a client for the given base URL (e.g. `http://localhost:5000/api`)
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and wait for the response
    pub async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, url = %url, "Sending API request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let data = parse_body(&text);

        if !status.is_success() {
            tracing::debug!(
                method = %request.method,
                url = %url,
                status = status.as_u16(),
                "API request failed"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: data,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }

    pub async fn get(&self, path: &str) -> ClientResult<ApiResponse> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn get_with_query(&self, path: &str, query: QueryParams) -> ClientResult<ApiResponse> {
        self.send(ApiRequest::get(path).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<ApiResponse> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    /// POST without a request body
    pub async fn post_empty(&self, path: &str) -> ClientResult<ApiResponse> {
        self.send(ApiRequest::post(path)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<ApiResponse> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }
}

/// Build `/{resource}/{id}[/{action}]` with the id percent-encoded
pub fn resource_path(resource: &str, id: &str, action: Option<&str>) -> String {
    let id = urlencoding::encode(id);
    match action {
        Some(action) => format!("/{}/{}/{}", resource, id, action),
        None => format!("/{}/{}", resource, id),
    }
}

fn parse_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}
