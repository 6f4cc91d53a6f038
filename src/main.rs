//! Survey Runner Dev Server
//!
//! Run with: cargo run --bin survey-runner
//!
//! Serves the application on `0.0.0.0:5174` (next free port when taken) and
//! proxies `/api` to `http://127.0.0.1:5000`.
//!
//! # Configuration
//!
//! Read from `config.toml` in the usual locations, then overridden by
//! environment variables:
//! - `SURVEY_RUNNER_API_URL`: Backend API base URL used by the views
//! - `SURVEY_RUNNER_HOST` / `SURVEY_RUNNER_PORT`: Listen address
//! - `SURVEY_RUNNER_STRICT_PORT`: Fail instead of trying the next port
//! - `SURVEY_RUNNER_PROXY_TARGET`: Backend origin for `/api`
//! - `RUST_LOG`: Log filter (default: survey_runner=info,tower_http=debug)

use anyhow::Context;
use survey_runner::app::{App, DEFAULT_ANCHOR};
use survey_runner::config::Config;
use survey_runner::dev_server::{self, ApiProxy, DevServerState};
use survey_runner::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    logging::init(&config.logging);

    tracing::info!("Starting Survey Runner v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend API: {}", config.api.base_url);

    let app = App::bootstrap(&config)
        .context("Failed to build application")?
        .mount(DEFAULT_ANCHOR)
        .context("Failed to mount application")?;

    let proxy = ApiProxy::new(&config.dev_server.proxy).context("Invalid proxy configuration")?;

    dev_server::serve(DevServerState::new(app, proxy), &config.dev_server).await?;

    tracing::info!("Survey Runner stopped");
    Ok(())
}
