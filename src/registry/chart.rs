//! Chart Component
//!
//! Renders a chart container carrying its option document; the chart
//! library on the page draws it.

use leptos::*;
use serde_json::{json, Value};

/// Name the chart component is registered under
pub const CHART_COMPONENT: &str = "v-chart";

const DEFAULT_HEIGHT: &str = "320px";

/// Chart container
#[component]
pub fn Chart(
    option: Value,
    #[prop(into)] height: String,
    autoresize: bool,
) -> impl IntoView {
    let style = format!("height:{}", height);
    let option = option.to_string();
    let autoresize = autoresize.to_string();

    view! {
        <div class="v-chart" style=style data-autoresize=autoresize data-option=option></div>
    }
}

/// Pie chart option for labelled counts
pub fn pie_option(title: &str, series: &[(String, u64)]) -> Value {
    let data: Vec<Value> = series
        .iter()
        .map(|(name, value)| json!({"name": name, "value": value}))
        .collect();

    json!({
        "title": {"text": title, "left": "center"},
        "tooltip": {"trigger": "item"},
        "series": [{"type": "pie", "radius": "60%", "data": data}]
    })
}

/// Registry entry. Props: `option` (chart option document), `height`,
/// `autoresize` (default on)
pub fn render_chart(_name: &str, props: &Value) -> View {
    let option = props.get("option").cloned().unwrap_or(Value::Null);
    let height = props
        .get("height")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_HEIGHT)
        .to_string();
    let autoresize = props
        .get("autoresize")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    view! { <Chart option=option height=height autoresize=autoresize/> }.into_view()
}
