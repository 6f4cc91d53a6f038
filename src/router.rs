//! Page Routes
//!
//! The four pages and the route table that maps paths onto them. History
//! mode: the location's path is matched, query string and fragment are
//! ignored. No guards, no parameters, no redirects. Anything else lands on
//! the not-found view.

use leptos::*;
use leptos_router::*;
use std::fmt;

use crate::views::{NotFound, RoutePage};

/// Application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Tasks,
    Surveys,
    Settings,
}

impl Page {
    /// Every page, in navigation order
    pub const ALL: [Page; 4] = [Page::Home, Page::Tasks, Page::Surveys, Page::Settings];

    /// Route name
    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Tasks => "tasks",
            Page::Surveys => "surveys",
            Page::Settings => "settings",
        }
    }

    /// Human-readable title for navigation and page headings
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Tasks => "Tasks",
            Page::Surveys => "Surveys",
            Page::Settings => "Settings",
        }
    }

    /// Path below the base path
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Tasks => "/tasks",
            Page::Surveys => "/surveys",
            Page::Settings => "/settings",
        }
    }

    pub fn by_name(name: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.name() == name)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Route table
#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes>
            <Route path="/" view=|| view! { <RoutePage page=Page::Home/> }/>
            <Route path="/tasks" view=|| view! { <RoutePage page=Page::Tasks/> }/>
            <Route path="/surveys" view=|| view! { <RoutePage page=Page::Surveys/> }/>
            <Route path="/settings" view=|| view! { <RoutePage page=Page::Settings/> }/>
            <Route path="/*any" view=NotFound/>
        </Routes>
    }
}

/// Normalize a configured base path: `""` at the root, otherwise a leading
/// slash and no trailing one (`"app/"` becomes `"/app"`).
pub fn base_path(base: &str) -> &'static str {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        return "";
    }
    // The router keeps its base for the life of the process
    Box::leak(format!("/{}", trimmed).into_boxed_str())
}
