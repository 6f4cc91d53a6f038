//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(config: &LoggingConfig) -> String {
    format!("survey_runner={},tower_http=debug", config.level)
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
