//! Survey API
//!
//! - `POST /surveys/parse` - Parse a survey from its URL
//! - `GET /surveys` - List surveys
//! - `GET /surveys/{id}` - Survey detail
//! - `DELETE /surveys/{id}` - Delete a survey

use crate::client::{resource_path, ApiResponse, ClientResult, HttpClient};

use super::dto::ParseSurveyRequest;

/// Survey endpoints
#[derive(Debug, Clone)]
pub struct SurveyApi {
    client: HttpClient,
}

impl SurveyApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Ask the backend to parse the survey at `url`
    pub async fn parse_survey(&self, url: &str) -> ClientResult<ApiResponse> {
        let body = ParseSurveyRequest {
            url: url.to_string(),
        };
        self.client.post("/surveys/parse", &body).await
    }

    pub async fn get_all_surveys(&self) -> ClientResult<ApiResponse> {
        self.client.get("/surveys").await
    }

    pub async fn get_survey(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client.get(&resource_path("surveys", id, None)).await
    }

    pub async fn delete_survey(&self, id: &str) -> ClientResult<ApiResponse> {
        self.client.delete(&resource_path("surveys", id, None)).await
    }
}
