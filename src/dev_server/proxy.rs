//! `/api` Reverse Proxy
//!
//! Forwards requests under the proxy prefix to the backend origin, keeping
//! method, path, query, body and end-to-end headers. With `change_origin`
//! the `Host` header is rewritten to the target's authority.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, StatusCode},
    response::Response,
};
use futures_util::TryStreamExt;
use reqwest::{redirect::Policy, Url};

use crate::config::ProxyConfig;

use super::error::{ServerError, ServerResult};

/// Largest request body buffered for forwarding (32 MB)
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Headers scoped to a single connection, never forwarded
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.contains(&name)
}

/// `api`, `/api/` and `/api` all become `/api`. A prefix of `/` would
/// swallow every page, so it is refused.
fn normalize_prefix(prefix: &str) -> ServerResult<String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ServerError::Internal(format!(
            "invalid proxy prefix {:?}: must name a path segment",
            prefix
        )));
    }
    Ok(format!("/{}", trimmed))
}

/// Reverse proxy for backend API calls
#[derive(Debug, Clone)]
pub struct ApiProxy {
    client: reqwest::Client,
    target: Url,
    prefix: String,
    change_origin: bool,
}

impl ApiProxy {
    pub fn new(config: &ProxyConfig) -> ServerResult<Self> {
        let target = Url::parse(&config.target).map_err(|e| {
            ServerError::Internal(format!("invalid proxy target {}: {}", config.target, e))
        })?;

        // Redirects go back to the browser untouched
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| ServerError::Internal(format!("proxy client: {}", e)))?;

        Ok(Self {
            client,
            target,
            prefix: normalize_prefix(&config.prefix)?,
            change_origin: config.change_origin,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Whether a request path belongs to the proxy (`/api` or `/api/...`)
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Upstream URL for a request path and query
    fn upstream_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.target.clone();
        let base = self.target.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", base, path));
        url.set_query(query);
        url
    }

    /// Forward a request and stream the backend response back
    pub async fn forward(&self, request: Request) -> ServerResult<Response> {
        let (parts, body) = request.into_parts();

        let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        let url = self.upstream_url(parts.uri.path(), parts.uri.query());

        let body = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ServerError::BadRequest(format!("request body: {}", e)))?;

        let mut upstream = self.client.request(method.clone(), url.clone());
        for (name, value) in parts.headers.iter() {
            let name = name.as_str();
            if is_hop_by_hop(name) || name == header::CONTENT_LENGTH.as_str() {
                continue;
            }
            // Without a Host header reqwest sends the target's authority
            if name == header::HOST.as_str() && self.change_origin {
                continue;
            }
            upstream = upstream.header(name, value.as_bytes());
        }
        if !body.is_empty() {
            upstream = upstream.body(body.to_vec());
        }

        tracing::debug!(method = %method, url = %url, "Proxying request");

        let response = upstream.send().await.map_err(|e| {
            ServerError::Upstream(format!("{} {}: {}", method, url, e))
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        let mut builder = Response::builder().status(status);
        for (name, value) in response.headers().iter() {
            let name = name.as_str();
            if is_hop_by_hop(name) || name == header::CONTENT_LENGTH.as_str() {
                continue;
            }
            builder = builder.header(name, value.as_bytes());
        }

        let stream = response
            .bytes_stream()
            .inspect_err(|e| tracing::warn!(error = %e, "Upstream body interrupted"));

        builder
            .body(Body::from_stream(stream))
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
