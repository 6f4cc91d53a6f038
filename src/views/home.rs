//! Home view: survey and task counts with a status chart.

use leptos::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::api::{Api, Envelope, TaskListParams, TaskPage};
use crate::registry::{pie_option, Registered, CHART_COMPONENT};

use super::{describe, ErrorBlock};

/// Tasks sampled for the status chart
const CHART_SAMPLE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub(super) struct HomeData {
    surveys: Result<usize, String>,
    tasks: Result<TaskPage, String>,
}

pub(super) async fn load(api: &Api) -> HomeData {
    let params = TaskListParams::new().page(1).page_size(CHART_SAMPLE_SIZE);
    let (surveys, tasks) = tokio::join!(api.surveys.get_all_surveys(), api.tasks.get_tasks(params));

    HomeData {
        surveys: surveys
            .and_then(|response| response.json::<Envelope<Vec<Value>>>())
            .map(|envelope| envelope.data.len())
            .map_err(|e| describe(&e)),
        tasks: tasks
            .and_then(|response| response.json::<TaskPage>())
            .map_err(|e| describe(&e)),
    }
}

#[component]
pub(super) fn HomePage(data: HomeData) -> impl IntoView {
    let surveys = match data.surveys {
        Ok(count) => {
            let count = count as u64;
            view! { <Stat icon="Document" label="Surveys" value=count/> }.into_view()
        }
        Err(message) => view! { <ErrorBlock what="surveys" message=message/> }.into_view(),
    };

    let tasks = match data.tasks {
        Ok(page) => {
            let series: Vec<(String, u64)> = status_counts(&page.items).into_iter().collect();
            let chart = (!series.is_empty()).then(|| {
                let props = json!({ "option": pie_option("Task status", &series) });
                view! { <Registered name=CHART_COMPONENT props=props/> }
            });

            view! {
                <Stat icon="List" label="Tasks" value=page.total/>
                {chart}
            }
            .into_view()
        }
        Err(message) => view! { <ErrorBlock what="tasks" message=message/> }.into_view(),
    };

    view! {
        <div class="stats">
            {surveys}
            {tasks}
        </div>
    }
}

#[component]
fn Stat(icon: &'static str, label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="stat">
            <Registered name=icon/>
            <span class="stat-label">{label}</span>
            <span class="stat-value">{value.to_string()}</span>
        </div>
    }
}

fn status_counts(items: &[Value]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for item in items {
        let status = item
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        *counts.entry(status).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use crate::views::render;
    use crate::views::tests::{context, visible_text};

    #[test]
    fn test_status_counts() {
        let items = vec![
            json!({"status": "running"}),
            json!({"status": "running"}),
            json!({"status": "completed"}),
            json!({}),
        ];
        let counts = status_counts(&items);
        assert_eq!(counts.get("running"), Some(&2));
        assert_eq!(counts.get("completed"), Some(&1));
        assert_eq!(counts.get("unknown"), Some(&1));
    }

    #[tokio::test]
    async fn test_home_renders_counts_and_chart() {
        let backend = MockBackend::builder()
            .respond(
                "GET",
                "/api/surveys",
                200,
                json!({"data": [{"id": "s1"}, {"id": "s2"}], "code": 200}),
            )
            .respond(
                "GET",
                "/api/tasks",
                200,
                json!({
                    "items": [{"id": "t1", "status": "running"}],
                    "total": 1, "page": 1, "page_size": 100, "pages": 1
                }),
            )
            .start()
            .await;
        let ctx = context(&backend);

        let page = render("/", &ctx, "app").await;
        let text = visible_text(&page.html);
        assert!(text.contains("Surveys 2"), "{}", text);
        assert!(text.contains("Tasks 1"), "{}", text);
        assert!(page.html.contains("class=\"v-chart\""));
        assert!(page.html.contains("running"));

        let task_request = backend
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/tasks")
            .unwrap();
        assert_eq!(task_request.query.as_deref(), Some("page=1&page_size=100"));
    }

    #[tokio::test]
    async fn test_home_shows_errors_inline() {
        let backend = MockBackend::builder()
            .respond("GET", "/api/surveys", 500, json!({"error": "disk full"}))
            .start()
            .await;
        let ctx = context(&backend);

        let page = render("/", &ctx, "app").await;
        assert!(page.is_found());
        assert!(visible_text(&page.html).contains("Failed to load surveys: disk full"));
    }
}
