//! Development Server
//!
//! Serves the mounted application and forwards API calls to the backend.
//!
//! # Routes
//!
//! - `GET /__health` - Liveness and proxy target
//! - `{prefix}/*` (default `/api`) - Reverse proxied to the backend
//! - everything else - Rendered through the route table as a full HTML
//!   document; paths outside it get the not-found view with a 404
//!
//! When the configured port is taken and `strict_port` is off, the following
//! ports are tried in order.

pub mod error;
pub mod proxy;

pub use error::{ServerError, ServerResult};
pub use proxy::ApiProxy;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app::MountedApp;
use crate::config::DevServerConfig;

/// Ports tried when the configured one is taken
pub const MAX_PORT_ATTEMPTS: u16 = 20;

/// Shared server state
#[derive(Debug)]
pub struct DevServerState {
    pub app: MountedApp,
    pub proxy: ApiProxy,
}

impl DevServerState {
    pub fn new(app: MountedApp, proxy: ApiProxy) -> Self {
        Self { app, proxy }
    }
}

/// Build the dev server router
pub fn build_router(state: DevServerState) -> Router {
    Router::new()
        .route("/__health", get(health))
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn health(State(state): State<Arc<DevServerState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "proxy": {
            "prefix": state.proxy.prefix(),
            "target": state.proxy.target().as_str(),
        },
    }))
}

async fn dispatch(
    State(state): State<Arc<DevServerState>>,
    request: Request,
) -> ServerResult<Response> {
    if state.proxy.matches(request.uri().path()) {
        return state.proxy.forward(request).await;
    }

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return Ok(StatusCode::METHOD_NOT_ALLOWED.into_response());
    }

    let location = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let page = state.app.render(location).await;
    let status = if page.is_found() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    Ok((status, Html(page.html)).into_response())
}

/// Bind `host:port`, moving on to the next ports while they are in use
pub async fn bind_with_fallback(host: &str, port: u16, strict: bool) -> ServerResult<TcpListener> {
    let last = if strict {
        port
    } else {
        port.saturating_add(MAX_PORT_ATTEMPTS - 1)
    };

    for candidate in port..=last {
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                if candidate != port {
                    tracing::warn!(requested = port, bound = candidate, "Port in use, using fallback");
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port = candidate, "Port in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ServerError::PortUnavailable {
        host: host.to_string(),
        first: port,
        last,
    })
}

/// Start the dev server
pub async fn serve(state: DevServerState, config: &DevServerConfig) -> ServerResult<()> {
    let listener = bind_with_fallback(&config.host, config.port, config.strict_port).await?;
    let addr = listener.local_addr()?;
    let target = state.proxy.target().to_string();
    let prefix = state.proxy.prefix().to_string();

    let router = build_router(state);

    tracing::info!(
        "Dev server listening on http://{} ({} -> {})",
        addr,
        prefix,
        target
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dev server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
