//! Settings view: current backend configuration.

use leptos::*;
use serde_json::Value;

use crate::api::Api;

use super::{describe, ErrorBlock};

#[derive(Debug, Clone)]
pub(super) struct SettingsData(Result<Value, String>);

pub(super) async fn load(api: &Api) -> SettingsData {
    let config = api
        .config
        .get_config()
        .await
        .map(|response| response.data)
        .map_err(|e| describe(&e));
    SettingsData(config)
}

#[component]
pub(super) fn SettingsPage(data: SettingsData) -> impl IntoView {
    match data.0 {
        Ok(config) => {
            let pretty = serde_json::to_string_pretty(&config).unwrap_or_else(|_| config.to_string());
            view! { <pre class="config">{pretty}</pre> }.into_view()
        }
        Err(message) => view! { <ErrorBlock what="configuration" message=message/> }.into_view(),
    }
}
