//! Backend REST API
//!
//! Endpoint calls grouped by resource. Each module is a stateless
//! pass-through over the shared [`HttpClient`](crate::client::HttpClient).
//!
//! # Endpoints
//!
//! ## Surveys
//! - `POST /surveys/parse` - Parse a survey from a URL
//! - `GET /surveys` - List surveys
//! - `GET /surveys/{id}` - Survey detail
//! - `DELETE /surveys/{id}` - Delete a survey
//!
//! ## Tasks
//! - `POST /tasks` - Create a task
//! - `GET /tasks` - List tasks (pagination/sort query parameters)
//! - `GET /tasks/{id}` - Task detail
//! - `POST /tasks/{id}/refresh` - Refresh task status
//! - `PUT /tasks/{id}/status` - Update task status
//! - `POST /tasks/{id}/pause` - Pause
//! - `POST /tasks/{id}/resume` - Resume
//! - `POST /tasks/{id}/stop` - Stop
//! - `DELETE /tasks/{id}` - Delete
//!
//! ## Config
//! - `GET /config` - Fetch configuration
//! - `PUT /config` - Replace configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use survey_runner::api::{Api, TaskDraft};
//! use survey_runner::client::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Api::new(HttpClient::new("http://localhost:5000/api")?);
//!
//!     api.surveys.parse_survey("https://www.wjx.cn/vm/example.aspx").await?;
//!     let created = api.tasks.create_task(&TaskDraft::new("example").count("5")).await?;
//!     println!("{}", created);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dto;
pub mod survey;
pub mod task;

pub use config::ConfigApi;
pub use dto::{CreatedTask, Envelope, NewTask, ParseSurveyRequest, TaskPage, TaskStatus};
pub use survey::SurveyApi;
pub use task::{TaskApi, TaskDraft, TaskListParams, DEFAULT_LLM_TYPE};

use crate::client::HttpClient;

/// All resource modules sharing one client
#[derive(Debug, Clone)]
pub struct Api {
    pub surveys: SurveyApi,
    pub tasks: TaskApi,
    pub config: ConfigApi,
}

impl Api {
    pub fn new(client: HttpClient) -> Self {
        Self {
            surveys: SurveyApi::new(client.clone()),
            tasks: TaskApi::new(client.clone()),
            config: ConfigApi::new(client),
        }
    }
}
