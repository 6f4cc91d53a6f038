//! # Survey Runner
//!
//! Frontend host for the survey parsing and task automation service: a typed
//! client for the backend REST API, the Leptos application with its route
//! table and component registry, and a development server that renders it
//! and proxies `/api` to the backend.
//!
//! ## Modules
//!
//! - [`client`]: HTTP client wrapper bound to the backend base URL
//! - [`api`]: Survey, task and config endpoint calls
//! - [`router`]: The four pages and the route table
//! - [`registry`]: Icon and chart components
//! - [`views`]: Page components, rendered on the server
//! - [`app`]: Application bootstrap and mounting
//! - [`dev_server`]: Development server with the `/api` reverse proxy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use survey_runner::{App, Config, DEFAULT_ANCHOR};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::bootstrap(&Config::default())?.mount(DEFAULT_ANCHOR)?;
//!
//!     let task = app.context().api.tasks.get_task("42").await?;
//!     println!("{}", task.data);
//!
//!     let page = app.render("/tasks").await;
//!     println!("{}", page.html);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod dev_server;
pub mod logging;
pub mod registry;
pub mod router;
pub mod views;

#[cfg(test)]
mod test_support;

// Re-export top-level types for convenience
pub use api::{
    Api, ConfigApi, CreatedTask, Envelope, NewTask, SurveyApi, TaskApi, TaskDraft,
    TaskListParams, TaskPage, TaskStatus,
};

pub use app::{App, AppError, MountedApp, DEFAULT_ANCHOR};

pub use client::{ClientError, ClientResult, HttpClient, QueryParams, DEFAULT_API_BASE};

pub use config::{Config, ConfigError, DevServerConfig, LoggingConfig, ProxyConfig};

pub use dev_server::{build_router, serve, ApiProxy, DevServerState, ServerError};

pub use registry::{
    ComponentRegistry, Registered, RegistryError, Render, CHART_COMPONENT, ICON_LIBRARY,
};

pub use router::Page;

pub use views::{RenderedPage, ViewContext};
