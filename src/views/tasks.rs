//! Tasks view: newest tasks first.

use leptos::*;
use serde_json::Value;

use crate::api::{Api, TaskListParams, TaskPage};
use crate::registry::Registered;

use super::{describe, display, EmptyNotice, ErrorBlock};

const PAGE_SIZE: u32 = 20;

const COLUMNS: [&str; 6] = ["id", "survey_id", "status", "progress", "count", "created_at"];

const ACTION_ICONS: [&str; 4] = ["VideoPause", "VideoPlay", "CircleClose", "Delete"];

#[derive(Debug, Clone)]
pub(super) struct TasksData(Result<TaskPage, String>);

pub(super) async fn load(api: &Api) -> TasksData {
    let params = TaskListParams::new()
        .page(1)
        .page_size(PAGE_SIZE)
        .sort_field("created_at")
        .sort_order("desc");

    let page = api
        .tasks
        .get_tasks(params)
        .await
        .and_then(|response| response.json::<TaskPage>())
        .map_err(|e| describe(&e));
    TasksData(page)
}

#[component]
pub(super) fn TasksPage(data: TasksData) -> impl IntoView {
    let page = match data.0 {
        Ok(page) => page,
        Err(message) => return view! { <ErrorBlock what="tasks" message=message/> }.into_view(),
    };

    if page.items.is_empty() {
        return view! { <EmptyNotice message="No tasks yet."/> }.into_view();
    }

    let summary = format!("Page {} of {} ({} tasks)", page.page, page.pages, page.total);

    view! {
        <table class="tasks">
            <thead>
                <tr>
                    {COLUMNS.into_iter().map(|column| view! { <th>{column}</th> }).collect::<Vec<_>>()}
                    <th>"actions"</th>
                </tr>
            </thead>
            <tbody>
                {page
                    .items
                    .into_iter()
                    .map(|task| view! { <TaskRow task=task/> })
                    .collect::<Vec<_>>()}
            </tbody>
        </table>
        <p class="pagination">{summary}</p>
    }
    .into_view()
}

#[component]
fn TaskRow(task: Value) -> impl IntoView {
    let id = display(task.get("id"));

    view! {
        <tr data-task=id>
            {COLUMNS
                .into_iter()
                .map(|column| view! { <td>{display(task.get(column))}</td> })
                .collect::<Vec<_>>()}
            <td class="actions">
                {ACTION_ICONS
                    .into_iter()
                    .map(|icon| view! { <Registered name=icon/> })
                    .collect::<Vec<_>>()}
            </td>
        </tr>
    }
}
