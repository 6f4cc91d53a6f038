//! Data Transfer Objects
//!
//! Request and response shapes of the backend REST API. Every operation also
//! exposes the raw JSON body, so these are conveniences, not a schema the
//! client enforces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// SURVEY DTOs
// ============================================

/// Survey parse request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSurveyRequest {
    /// Source URL of the survey form
    pub url: String,
}

/// Standard `{data, code, message}` wrapper used by the survey endpoints
/// and task detail
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================
// TASK DTOs
// ============================================

/// Canonical task creation payload, in the field order the backend expects.
///
/// `survey_id` is forwarded as given and left out when absent; an
/// unparseable `count` goes out as `null`. The backend validates both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<serde_json::Value>,
    pub count: Option<i64>,
    pub use_proxy: bool,
    pub proxy_url: String,
    pub use_llm: bool,
    pub llm_type: String,
}

/// Task creation response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTask {
    pub task_id: String,
}

/// Paginated task list
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPage {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
    #[serde(default)]
    pub pages: u64,
}

/// Task status values accepted by `PUT /tasks/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Paused,
    Stopped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Paused => "paused",
            TaskStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(TaskStatus::Running),
            "paused" => Ok(TaskStatus::Paused),
            "stopped" => Ok(TaskStatus::Stopped),
            other => Err(format!(
                "Invalid task status: {}. Use: running, paused, stopped",
                other
            )),
        }
    }
}

/// Task status update request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdateRequest {
    pub status: TaskStatus,
}
