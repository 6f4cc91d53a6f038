//! Application Bootstrap
//!
//! Builds the single application instance: API client, component registry
//! (every icon plus the chart component) and base path for the router.
//! Mounting consumes the instance, so an application can only be mounted
//! once and there is no teardown path.

use std::sync::Arc;
use thiserror::Error;

use crate::api::Api;
use crate::client::{ClientError, HttpClient};
use crate::config::Config;
use crate::registry::{render_chart, ComponentRegistry, CHART_COMPONENT, ICON_LIBRARY};
use crate::router;
use crate::views::{self, RenderedPage, ViewContext};

/// Default DOM anchor
pub const DEFAULT_ANCHOR: &str = "#app";

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Invalid mount anchor {0:?}: expected an id selector like \"#app\"")]
    InvalidAnchor(String),
}

/// An application that has been built but not yet mounted
#[derive(Debug)]
pub struct App {
    ctx: ViewContext,
}

impl App {
    /// Build the application from configuration
    pub fn bootstrap(config: &Config) -> Result<Self, AppError> {
        let client = HttpClient::new(&config.api.base_url)?;
        Ok(Self::with_parts(
            Api::new(client),
            &config.dev_server.base_path,
            default_registry(),
        ))
    }

    /// Build from already constructed parts
    pub fn with_parts(api: Api, base_path: &str, registry: ComponentRegistry) -> Self {
        Self {
            ctx: ViewContext {
                api,
                registry: Arc::new(registry),
                base: router::base_path(base_path),
            },
        }
    }

    pub fn api(&self) -> &Api {
        &self.ctx.api
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.ctx.registry
    }

    pub fn base_path(&self) -> &str {
        self.ctx.base
    }

    /// Mount onto a DOM anchor (`#id`)
    pub fn mount(self, anchor: &str) -> Result<MountedApp, AppError> {
        let anchor_id = anchor
            .strip_prefix('#')
            .filter(|id| !id.is_empty() && !id.contains(char::is_whitespace))
            .ok_or_else(|| AppError::InvalidAnchor(anchor.to_string()))?
            .to_string();

        tracing::info!(
            anchor = %anchor,
            components = self.ctx.registry.len(),
            base_path = %self.ctx.base,
            "Application mounted"
        );

        Ok(MountedApp {
            anchor_id,
            ctx: self.ctx,
        })
    }
}

/// Registry with every icon and the chart component
pub fn default_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.register_icons(ICON_LIBRARY);
    registry.register(CHART_COMPONENT, render_chart);
    registry
}

/// A mounted application, ready to render pages
#[derive(Debug)]
pub struct MountedApp {
    anchor_id: String,
    ctx: ViewContext,
}

impl MountedApp {
    pub fn anchor_id(&self) -> &str {
        &self.anchor_id
    }

    pub fn base_path(&self) -> &str {
        self.ctx.base
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Render the full HTML document for a location. Locations outside the
    /// route table render the not-found view, with `page` left empty.
    pub async fn render(&self, location: &str) -> RenderedPage {
        views::render(location, &self.ctx, &self.anchor_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Page;
    use crate::test_support::MockBackend;

    fn test_config(api_base: String) -> Config {
        let mut config = Config::default();
        config.api.base_url = api_base;
        config
    }

    #[test]
    fn test_bootstrap_registers_components() {
        let app = App::bootstrap(&Config::default()).unwrap();

        assert!(app.registry().contains(CHART_COMPONENT));
        for icon in ICON_LIBRARY {
            assert!(app.registry().contains(icon));
        }
        assert_eq!(app.registry().len(), ICON_LIBRARY.len() + 1);
        assert_eq!(app.base_path(), "");
    }

    #[test]
    fn test_bootstrap_rejects_bad_base_url() {
        let config = test_config("::nope".to_string());
        assert!(matches!(App::bootstrap(&config), Err(AppError::Client(_))));
    }

    #[test]
    fn test_mount_anchor_validation() {
        let app = App::bootstrap(&Config::default()).unwrap();
        assert!(matches!(app.mount("app"), Err(AppError::InvalidAnchor(_))));

        let app = App::bootstrap(&Config::default()).unwrap();
        assert!(matches!(app.mount("#"), Err(AppError::InvalidAnchor(_))));

        let app = App::bootstrap(&Config::default()).unwrap();
        let mounted = app.mount(DEFAULT_ANCHOR).unwrap();
        assert_eq!(mounted.anchor_id(), "app");
    }

    #[test]
    fn test_base_path_from_config() {
        let mut config = Config::default();
        config.dev_server.base_path = "/ui/".to_string();

        let app = App::bootstrap(&config).unwrap();
        assert_eq!(app.base_path(), "/ui");
    }

    #[tokio::test]
    async fn test_render_document() {
        let backend = MockBackend::start().await;
        let mounted = App::bootstrap(&test_config(backend.api_base()))
            .unwrap()
            .mount(DEFAULT_ANCHOR)
            .unwrap();

        let page = mounted.render("/surveys").await;
        assert_eq!(page.page, Some(Page::Surveys));
        assert!(page.html.contains("id=\"app\""));
        assert!(page.html.contains("class=\"nav\""));

        assert!(!mounted.render("/undefined").await.is_found());
    }
}
