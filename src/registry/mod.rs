//! Component Registry
//!
//! Named Leptos components available to every page: the icon library and
//! the `v-chart` chart. Pages place them by name through [`Registered`], so
//! the set can be swapped or extended at bootstrap without touching views.

mod chart;
mod icons;

pub use chart::{pie_option, render_chart, Chart, CHART_COMPONENT};
pub use icons::{render_icon, Icon, ICON_LIBRARY};

use leptos::*;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Renders a registered component from its registered name and JSON props
pub type Render = fn(&str, &Value) -> View;

/// Registry errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
}

/// Name -> component registry
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Render>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component. A later registration under the same name wins.
    pub fn register(&mut self, name: impl Into<String>, render: Render) -> Option<Render> {
        let name = name.into();
        let previous = self.components.insert(name.clone(), render);
        if previous.is_some() {
            tracing::warn!(component = %name, "Component registered twice, replacing");
        }
        previous
    }

    /// Register every glyph of an icon library under its own name
    pub fn register_icons(&mut self, library: &[&str]) {
        for name in library {
            self.register(*name, render_icon);
        }
        tracing::debug!(count = library.len(), "Registered icon components");
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Render a component by name
    pub fn render(&self, name: &str, props: &Value) -> Result<View, RegistryError> {
        self.components
            .get(name)
            .map(|render| render(name, props))
            .ok_or_else(|| RegistryError::UnknownComponent(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}

/// Place a registered component. Renders nothing, with a warning, when the
/// name is not registered.
#[component]
pub fn Registered(
    #[prop(into)] name: String,
    #[prop(optional)] props: Option<Value>,
) -> impl IntoView {
    let Some(registry) = use_context::<Arc<ComponentRegistry>>() else {
        tracing::warn!(component = %name, "No component registry in scope");
        return ().into_view();
    };

    match registry.render(&name, &props.unwrap_or(Value::Null)) {
        Ok(view) => view,
        Err(e) => {
            tracing::warn!(error = %e, "Component missing at render time");
            ().into_view()
        }
    }
}
