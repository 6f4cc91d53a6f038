//! Page Views
//!
//! Leptos components for the four pages, rendered to HTML on the server.
//!
//! Rendering takes two passes over the same component tree. The first runs
//! the route table with no data, which tells us which page the location
//! belongs to. That page's data is then fetched, and the second pass renders
//! it. API failures render as an inline error block; they never fail the
//! page.

mod home;
mod settings;
mod surveys;
mod tasks;

use leptos::*;
use leptos_router::*;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crate::api::Api;
use crate::client::ClientError;
use crate::registry::{ComponentRegistry, Registered};
use crate::router::{AppRoutes, Page};

const APP_TITLE: &str = "Survey Runner";

const NOT_FOUND_TITLE: &str = "Not Found";

/// Everything a page needs to render
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub api: Api,
    pub registry: Arc<ComponentRegistry>,
    /// Normalized base path, `""` at the root
    pub base: &'static str,
}

/// A rendered HTML document
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Matched page; `None` when the location fell through to not-found
    pub page: Option<Page>,
    pub title: String,
    pub html: String,
}

impl RenderedPage {
    pub fn is_found(&self) -> bool {
        self.page.is_some()
    }
}

/// Data fetched for a page ahead of its final render
#[derive(Debug, Clone)]
enum PageData {
    Home(home::HomeData),
    Tasks(tasks::TasksData),
    Surveys(surveys::SurveysData),
    Settings(settings::SettingsData),
}

async fn load(page: Page, api: &Api) -> PageData {
    match page {
        Page::Home => PageData::Home(home::load(api).await),
        Page::Tasks => PageData::Tasks(tasks::load(api).await),
        Page::Surveys => PageData::Surveys(surveys::load(api).await),
        Page::Settings => PageData::Settings(settings::load(api).await),
    }
}

/// Per-render state shared with the route components
#[derive(Clone)]
struct RenderState {
    data: Rc<Option<PageData>>,
    matched: Rc<Cell<Option<Page>>>,
}

/// Render the document for a location (path plus optional query)
pub async fn render(location: &str, ctx: &ViewContext, anchor_id: &str) -> RenderedPage {
    let url = if location.starts_with('/') {
        format!("http://localhost{}", location)
    } else {
        format!("http://localhost/{}", location)
    };

    let (matched, html) = render_pass(ctx, anchor_id, &url, None, NOT_FOUND_TITLE);
    let Some(page) = matched else {
        tracing::debug!(location = %location, "No route for location");
        return RenderedPage {
            page: None,
            title: NOT_FOUND_TITLE.to_string(),
            html,
        };
    };

    let data = load(page, &ctx.api).await;
    let title = format!("{} - {}", page.title(), APP_TITLE);
    let (_, html) = render_pass(ctx, anchor_id, &url, Some(data), &title);

    RenderedPage {
        page: Some(page),
        title,
        html,
    }
}

/// One synchronous render; the reactive runtime lives only inside this call
fn render_pass(
    ctx: &ViewContext,
    anchor_id: &str,
    url: &str,
    data: Option<PageData>,
    title: &str,
) -> (Option<Page>, String) {
    let state = RenderState {
        data: Rc::new(data),
        matched: Rc::default(),
    };
    let matched = Rc::clone(&state.matched);

    let registry = Arc::clone(&ctx.registry);
    let base = ctx.base;
    let anchor_id = anchor_id.to_string();
    let url = url.to_string();
    let title = title.to_string();

    let html = leptos::ssr::render_to_string(move || {
        view! {
            <Document
                title=title
                anchor_id=anchor_id
                base=base
                url=url
                state=state
                registry=registry
            />
        }
    });

    (matched.get(), format!("<!DOCTYPE html>{}", html))
}

/// The full page: document shell, navigation and the routed view
#[component]
fn Document(
    title: String,
    anchor_id: String,
    base: &'static str,
    url: String,
    state: RenderState,
    registry: Arc<ComponentRegistry>,
) -> impl IntoView {
    provide_context(RouterIntegrationContext::new(ServerIntegration { path: url }));
    provide_context(state);
    provide_context(registry);

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <title>{title}</title>
            </head>
            <body>
                <div id=anchor_id>
                    <Router base=base>
                        <Nav/>
                        <main class="content">
                            <AppRoutes/>
                        </main>
                    </Router>
                </div>
            </body>
        </html>
    }
}

fn nav_icon(page: Page) -> &'static str {
    match page {
        Page::Home => "HomeFilled",
        Page::Tasks => "List",
        Page::Surveys => "Document",
        Page::Settings => "Setting",
    }
}

/// Navigation bar
#[component]
fn Nav() -> impl IntoView {
    view! {
        <nav class="nav">
            {Page::ALL
                .into_iter()
                .map(|page| view! { <NavLink page=page/> })
                .collect::<Vec<_>>()}
        </nav>
    }
}

#[component]
fn NavLink(page: Page) -> impl IntoView {
    view! {
        <A href=page.path() class="nav-link" active_class="active" exact=true>
            <Registered name=nav_icon(page)/>
            {page.title()}
        </A>
    }
}

/// Route target for one page. Records the match, then renders the page
/// once its data has been loaded.
#[component]
pub(crate) fn RoutePage(page: Page) -> impl IntoView {
    let Some(state) = use_context::<RenderState>() else {
        return ().into_view();
    };
    state.matched.set(Some(page));

    let body = match &*state.data {
        Some(PageData::Home(data)) => view! { <home::HomePage data=data.clone()/> }.into_view(),
        Some(PageData::Tasks(data)) => view! { <tasks::TasksPage data=data.clone()/> }.into_view(),
        Some(PageData::Surveys(data)) => {
            view! { <surveys::SurveysPage data=data.clone()/> }.into_view()
        }
        Some(PageData::Settings(data)) => {
            view! { <settings::SettingsPage data=data.clone()/> }.into_view()
        }
        None => return ().into_view(),
    };

    view! {
        <section class=format!("page page-{}", page.name())>
            <h1>{page.title()}</h1>
            {body}
        </section>
    }
    .into_view()
}

/// Fallback for locations outside the route table
#[component]
pub(crate) fn NotFound() -> impl IntoView {
    let path = use_location().pathname.get_untracked();

    view! {
        <section class="not-found">
            <h1>"Page Not Found"</h1>
            <p>{format!("No page at {}", path)}</p>
            <A href="/">"Home"</A>
        </section>
    }
}

/// Inline failure notice for one data source
#[component]
fn ErrorBlock(what: &'static str, message: String) -> impl IntoView {
    view! {
        <div class="error" role="alert">
            <Registered name="WarningFilled"/>
            <span>{format!("Failed to load {}: {}", what, message)}</span>
        </div>
    }
}

/// Placeholder for an empty list
#[component]
fn EmptyNotice(message: &'static str) -> impl IntoView {
    view! {
        <p class="empty">
            <Registered name="InfoFilled"/>
            <span>{message}</span>
        </p>
    }
}

/// Backend message when there is one, the error itself otherwise
fn describe(err: &ClientError) -> String {
    err.message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

/// Display text for a JSON field (strings unquoted, missing as `-`)
fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
