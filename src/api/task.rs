//! Task API
//!
//! - `POST /tasks` - Create a task (payload normalized first)
//! - `GET /tasks` - List tasks, query parameters forwarded verbatim
//! - `GET /tasks/{id}` - Task detail
//! - `POST /tasks/{id}/refresh` - Ask the backend to refresh status
//! - `PUT /tasks/{id}/status` - Set status
//! - `POST /tasks/{id}/pause|resume|stop` - Lifecycle actions
//! - `DELETE /tasks/{id}` - Delete a task

use serde::Deserialize;
use serde_json::Value;

use crate::client::{resource_path, ApiResponse, ClientResult, HttpClient, QueryParams};

use super::dto::{NewTask, StatusUpdateRequest, TaskStatus};

/// Default LLM provider when a draft names none
pub const DEFAULT_LLM_TYPE: &str = "aliyun";

/// Loosely typed task input, as collected from a form or a JSON document.
///
/// Fields keep whatever JSON shape the caller supplied; [`TaskDraft::normalize`]
/// turns them into the canonical [`NewTask`] payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub survey_id: Option<Value>,
    #[serde(default)]
    pub count: Option<Value>,
    #[serde(default)]
    pub use_proxy: Option<Value>,
    #[serde(default)]
    pub proxy_url: Option<Value>,
    #[serde(default)]
    pub use_llm: Option<Value>,
    #[serde(default)]
    pub llm_type: Option<Value>,
}

impl TaskDraft {
    pub fn new(survey_id: impl Into<String>) -> Self {
        Self {
            survey_id: Some(Value::String(survey_id.into())),
            ..Default::default()
        }
    }

    pub fn count(mut self, count: impl Into<Value>) -> Self {
        self.count = Some(count.into());
        self
    }

    pub fn use_proxy(mut self, use_proxy: impl Into<Value>) -> Self {
        self.use_proxy = Some(use_proxy.into());
        self
    }

    pub fn proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(Value::String(proxy_url.into()));
        self
    }

    pub fn use_llm(mut self, use_llm: impl Into<Value>) -> Self {
        self.use_llm = Some(use_llm.into());
        self
    }

    pub fn llm_type(mut self, llm_type: impl Into<String>) -> Self {
        self.llm_type = Some(Value::String(llm_type.into()));
        self
    }

    /// Fill defaults and coerce types. Nothing is rejected here; the
    /// backend validates the result.
    ///
    /// - `survey_id`: passed through untouched
    /// - `count`: integer, float (truncated) or a string with a leading
    ///   integer; anything else, including out-of-range numbers, is `None`
    /// - `use_proxy`, `use_llm`: JSON truthiness; absent is `false`
    /// - `proxy_url`: absent or falsy becomes `""`
    /// - `llm_type`: absent or falsy becomes [`DEFAULT_LLM_TYPE`]
    pub fn normalize(&self) -> NewTask {
        NewTask {
            survey_id: self.survey_id.clone(),
            count: self.count.as_ref().and_then(coerce_integer),
            use_proxy: self.use_proxy.as_ref().map(is_truthy).unwrap_or(false),
            proxy_url: text_or(self.proxy_url.as_ref(), ""),
            use_llm: self.use_llm.as_ref().map(is_truthy).unwrap_or(false),
            llm_type: text_or(self.llm_type.as_ref(), DEFAULT_LLM_TYPE),
        }
    }
}

impl From<NewTask> for TaskDraft {
    fn from(task: NewTask) -> Self {
        Self {
            survey_id: task.survey_id,
            count: task.count.map(Value::from),
            use_proxy: Some(Value::Bool(task.use_proxy)),
            proxy_url: Some(Value::String(task.proxy_url)),
            use_llm: Some(Value::Bool(task.use_llm)),
            llm_type: Some(Value::String(task.llm_type)),
        }
    }
}

/// Query parameters for `GET /tasks`.
///
/// The setters cover the keys the backend understands today; anything else
/// goes through [`param`](Self::param). Order is preserved and nothing is
/// validated client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListParams {
    params: QueryParams,
}

impl TaskListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, page: u32) -> Self {
        self.param("page", page)
    }

    pub fn page_size(self, page_size: u32) -> Self {
        self.param("page_size", page_size)
    }

    pub fn sort_field(self, field: &str) -> Self {
        self.param("sort_field", field)
    }

    pub fn sort_order(self, order: &str) -> Self {
        self.param("sort_order", order)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push(key, value);
        self
    }

    pub fn into_query(self) -> QueryParams {
        self.params
    }
}

impl From<QueryParams> for TaskListParams {
    fn from(params: QueryParams) -> Self {
        Self { params }
    }
}

/// Task endpoints
#[derive(Debug, Clone)]
pub struct TaskApi {
    client: HttpClient,
}

impl TaskApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Normalize the draft and create the task, returning the response body.
    ///
    /// The outgoing payload and any failure are logged; the error itself is
    /// returned unchanged.
    pub async fn create_task(&self, draft: &TaskDraft) -> ClientResult<Value> {
        tracing::info!(draft = ?draft, "Creating task");

        let payload = draft.normalize();
        tracing::debug!(payload = ?payload, "Normalized task payload");

        match self.client.post("/tasks", &payload).await {
            Ok(response) => Ok(response.into_data()),
            Err(e) => {
                tracing::error!(error = %e, payload = ?payload, "Failed to create task");
                Err(e)
            }
        }
    }

    pub async fn get_tasks(&self, params: TaskListParams) -> ClientResult<ApiResponse> {
        self.client.get_with_query("/tasks", params.into_query()).await
    }

    pub async fn get_task(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client.get(&resource_path("tasks", id, None)).await
    }

    /// Ask the backend to recompute the task's status. No polling here.
    pub async fn refresh_task(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client
            .post_empty(&resource_path("tasks", id, Some("refresh")))
            .await
    }

    pub async fn update_task_status(&self, id: &str, status: TaskStatus) -> ClientResult<ApiResponse> {
        self.client
            .put(
                &resource_path("tasks", id, Some("status")),
                &StatusUpdateRequest { status },
            )
            .await
    }

    pub async fn pause_task(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client
            .post_empty(&resource_path("tasks", id, Some("pause")))
            .await
    }

    pub async fn resume_task(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client
            .post_empty(&resource_path("tasks", id, Some("resume")))
            .await
    }

    pub async fn stop_task(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client
            .post_empty(&resource_path("tasks", id, Some("stop")))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client.delete(&resource_path("tasks", id, None)).await
    }
}

/// JSON truthiness: `false`, `0`, NaN, `""` and `null` are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String value, or `default` when absent or falsy
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(v) if is_truthy(v) => match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        _ => default.to_string(),
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_float)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Truncate toward zero; `None` for NaN, infinities and values outside `i64`
fn truncate_float(f: f64) -> Option<i64> {
    let truncated = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

/// Parse the leading base-10 integer of a string (`" 12abc"` -> 12)
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::CreatedTask;
    use crate::client::ClientError;
    use crate::test_support::MockBackend;
    use serde_json::json;

    fn setup(backend: &MockBackend) -> TaskApi {
        TaskApi::new(HttpClient::new(backend.api_base()).unwrap())
    }

    fn draft_from(value: Value) -> TaskDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_coerces_loose_input() {
        let draft = draft_from(json!({
            "survey_id": "s1",
            "count": "5",
            "use_proxy": 1,
            "use_llm": 0
        }));

        let payload = draft.normalize();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "survey_id": "s1",
                "count": 5,
                "use_proxy": true,
                "proxy_url": "",
                "use_llm": false,
                "llm_type": "aliyun"
            })
        );
    }

    #[test]
    fn test_normalize_keeps_explicit_values() {
        let draft = TaskDraft::new("s2")
            .count(3)
            .use_proxy(true)
            .proxy_url("http://proxy.local:8080")
            .use_llm(true)
            .llm_type("zhipu");

        let payload = draft.normalize();
        assert_eq!(payload.count, Some(3));
        assert!(payload.use_proxy);
        assert_eq!(payload.proxy_url, "http://proxy.local:8080");
        assert!(payload.use_llm);
        assert_eq!(payload.llm_type, "zhipu");
    }

    #[test]
    fn test_normalize_falsy_defaults() {
        let draft = draft_from(json!({
            "survey_id": 7,
            "count": 2.9,
            "use_proxy": "",
            "proxy_url": null,
            "use_llm": null,
            "llm_type": ""
        }));

        let payload = draft.normalize();
        assert_eq!(payload.survey_id, Some(json!(7)));
        assert_eq!(payload.count, Some(2));
        assert!(!payload.use_proxy);
        assert_eq!(payload.proxy_url, "");
        assert!(!payload.use_llm);
        assert_eq!(payload.llm_type, DEFAULT_LLM_TYPE);
    }

    #[test]
    fn test_normalize_leaves_validation_to_backend() {
        let payload = draft_from(json!({"survey_id": "s1", "count": "many"})).normalize();
        assert_eq!(payload.count, None);
        assert_eq!(serde_json::to_value(&payload).unwrap()["count"], Value::Null);

        let payload = draft_from(json!({"survey_id": {"id": "s1"}, "count": 1})).normalize();
        assert_eq!(payload.survey_id, Some(json!({"id": "s1"})));

        // An absent survey_id is left out of the body entirely
        let body = serde_json::to_value(draft_from(json!({"count": 1})).normalize()).unwrap();
        assert!(body.get("survey_id").is_none());
        assert_eq!(body["count"], 1);
    }

    #[test]
    fn test_out_of_range_count_is_unparseable() {
        assert_eq!(coerce_integer(&json!(1e21)), None);
        assert_eq!(coerce_integer(&json!(-1e21)), None);
        assert_eq!(coerce_integer(&json!(9.3e18)), None);
        assert_eq!(coerce_integer(&json!(u64::MAX)), None);
        assert_eq!(coerce_integer(&json!(-2.5)), Some(-2));
        assert_eq!(coerce_integer(&json!("99999999999999999999")), None);

        let payload = draft_from(json!({"survey_id": "s1", "count": 1e21})).normalize();
        assert_eq!(payload.count, None);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("5"), Some(5));
        assert_eq!(parse_leading_int("  12abc"), Some(12));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("4.8"), Some(4));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("x1"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([])));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }

    #[tokio::test]
    async fn test_create_task_sends_normalized_body() {
        let backend = MockBackend::builder()
            .respond("POST", "/api/tasks", 200, json!({"task_id": "t-1"}))
            .start()
            .await;
        let api = setup(&backend);

        let draft = draft_from(json!({
            "survey_id": "s1",
            "count": "5",
            "use_proxy": 1,
            "use_llm": 0
        }));
        let body = api.create_task(&draft).await.unwrap();

        assert_eq!(body, json!({"task_id": "t-1"}));

        let req = backend.last_request();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/tasks");
        assert_eq!(
            req.json(),
            json!({
                "survey_id": "s1",
                "count": 5,
                "use_proxy": true,
                "proxy_url": "",
                "use_llm": false,
                "llm_type": "aliyun"
            })
        );
    }

    #[tokio::test]
    async fn test_create_task_propagates_failure() {
        let backend = MockBackend::builder()
            .respond("POST", "/api/tasks", 400, json!({"error": "Missing required fields"}))
            .start()
            .await;
        let api = setup(&backend);

        let err = api
            .create_task(&TaskDraft::new("s1").count(1))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_count_reaches_backend() {
        let backend = MockBackend::builder()
            .respond("POST", "/api/tasks", 400, json!({"error": "count must be an integer"}))
            .start()
            .await;
        let api = setup(&backend);

        let err = api
            .create_task(&TaskDraft::new("s1").count("abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Status { status: 400, .. }));
        assert_eq!(err.message(), Some("count must be an integer"));

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].json()["count"], Value::Null);
        assert_eq!(requests[0].json()["survey_id"], "s1");
    }

    #[tokio::test]
    async fn test_created_task_id() {
        let backend = MockBackend::builder()
            .respond("POST", "/api/tasks", 201, json!({"task_id": "t-7"}))
            .start()
            .await;
        let api = setup(&backend);

        let body = api
            .create_task(&TaskDraft::new("s1").count(2))
            .await
            .unwrap();
        let created: CreatedTask = serde_json::from_value(body).unwrap();
        assert_eq!(created.task_id, "t-7");
    }

    #[tokio::test]
    async fn test_get_tasks_forwards_query_verbatim() {
        let backend = MockBackend::start().await;
        let api = setup(&backend);

        let params = TaskListParams::new().page(2).param("sort", "created_at");
        api.get_tasks(params).await.unwrap();

        let req = backend.last_request();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/api/tasks");
        assert_eq!(req.query.as_deref(), Some("page=2&sort=created_at"));
    }

    #[tokio::test]
    async fn test_get_tasks_without_params() {
        let backend = MockBackend::start().await;
        let api = setup(&backend);

        api.get_tasks(TaskListParams::new()).await.unwrap();
        assert_eq!(backend.last_request().query, None);
    }

    #[tokio::test]
    async fn test_task_endpoint_table() {
        let backend = MockBackend::start().await;
        let api = setup(&backend);

        api.get_task("42").await.unwrap();
        api.refresh_task("42").await.unwrap();
        api.update_task_status("42", TaskStatus::Running).await.unwrap();
        api.pause_task("42").await.unwrap();
        api.resume_task("42").await.unwrap();
        api.stop_task("42").await.unwrap();
        api.delete_task("42").await.unwrap();

        let requests = backend.requests();
        let seen: Vec<(&str, &str)> = requests
            .iter()
            .map(|r| (r.method.as_str(), r.path.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("GET", "/api/tasks/42"),
                ("POST", "/api/tasks/42/refresh"),
                ("PUT", "/api/tasks/42/status"),
                ("POST", "/api/tasks/42/pause"),
                ("POST", "/api/tasks/42/resume"),
                ("POST", "/api/tasks/42/stop"),
                ("DELETE", "/api/tasks/42"),
            ]
        );

        assert_eq!(requests[2].json(), json!({"status": "running"}));
        // lifecycle actions carry no body
        assert!(requests[3].body.is_empty());
        assert!(requests[1].body.is_empty());
    }
}
