//! Surveys view.

use leptos::*;
use serde_json::Value;

use crate::api::{Api, Envelope};
use crate::registry::Registered;

use super::{describe, display, EmptyNotice, ErrorBlock};

#[derive(Debug, Clone)]
pub(super) struct SurveysData(Result<Vec<Value>, String>);

pub(super) async fn load(api: &Api) -> SurveysData {
    let surveys = api
        .surveys
        .get_all_surveys()
        .await
        .and_then(|response| response.json::<Envelope<Vec<Value>>>())
        .map(|envelope| envelope.data)
        .map_err(|e| describe(&e));
    SurveysData(surveys)
}

#[component]
pub(super) fn SurveysPage(data: SurveysData) -> impl IntoView {
    let surveys = match data.0 {
        Ok(surveys) => surveys,
        Err(message) => {
            return view! { <ErrorBlock what="surveys" message=message/> }.into_view()
        }
    };

    if surveys.is_empty() {
        return view! { <EmptyNotice message="No surveys parsed yet."/> }.into_view();
    }

    view! {
        <ul class="surveys">
            {surveys
                .into_iter()
                .map(|survey| view! { <SurveyItem survey=survey/> })
                .collect::<Vec<_>>()}
        </ul>
    }
    .into_view()
}

#[component]
fn SurveyItem(survey: Value) -> impl IntoView {
    let id = display(survey.get("id"));
    // Untitled surveys show their id
    let title = display(
        survey
            .get("title")
            .filter(|title| !title.is_null())
            .or_else(|| survey.get("id")),
    );
    let link = survey
        .get("url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .map(|url| {
            view! {
                <a href=url rel="noopener">
                    <Registered name="Link"/>
                </a>
            }
        });

    view! {
        <li data-survey=id>
            <span class="survey-title">{title}</span>
            {link}
        </li>
    }
}
