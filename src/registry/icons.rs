//! Icon Library
//!
//! Icon components, one per glyph, registered under their own names.

use leptos::*;
use serde_json::Value;

/// Glyph names shipped with the icon library
pub const ICON_LIBRARY: &[&str] = &[
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "Check",
    "CircleCheck",
    "CircleClose",
    "Close",
    "CopyDocument",
    "DataAnalysis",
    "DataLine",
    "Delete",
    "Document",
    "Download",
    "Edit",
    "Files",
    "HomeFilled",
    "InfoFilled",
    "Link",
    "List",
    "Loading",
    "Monitor",
    "More",
    "Odometer",
    "Plus",
    "QuestionFilled",
    "Refresh",
    "Search",
    "Setting",
    "Share",
    "Star",
    "SuccessFilled",
    "Timer",
    "Tools",
    "Upload",
    "VideoPause",
    "VideoPlay",
    "View",
    "Warning",
    "WarningFilled",
];

/// A single icon glyph
#[component]
pub fn Icon(
    #[prop(into)] name: String,
    size: Option<String>,
    color: Option<String>,
) -> impl IntoView {
    let style = icon_style(size.as_deref(), color.as_deref());

    view! { <i class="icon" data-icon=name style=style aria-hidden="true"></i> }
}

fn icon_style(size: Option<&str>, color: Option<&str>) -> Option<String> {
    let mut style = String::new();
    if let Some(size) = size {
        style.push_str(&format!("font-size:{};", size));
    }
    if let Some(color) = color {
        style.push_str(&format!("color:{};", color));
    }
    (!style.is_empty()).then_some(style)
}

/// Registry entry for every glyph. Props: `size` (CSS length), `color`
pub fn render_icon(name: &str, props: &Value) -> View {
    let size = props.get("size").and_then(Value::as_str).map(str::to_string);
    let color = props.get("color").and_then(Value::as_str).map(str::to_string);

    view! { <Icon name=name size=size color=color/> }.into_view()
}
