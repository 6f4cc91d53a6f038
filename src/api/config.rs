//! Config API
//!
//! - `GET /config` - Fetch the backend configuration
//! - `PUT /config` - Replace it wholesale

use serde::Serialize;

use crate::client::{ApiResponse, ClientResult, HttpClient};

/// Backend configuration endpoints.
///
/// The configuration is an opaque JSON object; no schema is applied here.
#[derive(Debug, Clone)]
pub struct ConfigApi {
    client: HttpClient,
}

impl ConfigApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub async fn get_config(&self) -> ClientResult<ApiResponse> {
        self.client.get("/config").await
    }

    pub async fn update_config<T: Serialize + ?Sized>(&self, config: &T) -> ClientResult<ApiResponse> {
        self.client.put("/config", config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_and_replace_config() {
        let backend = MockBackend::builder()
            .respond(
                "GET",
                "/api/config",
                200,
                json!({"proxy_settings": {"enabled": false, "url": ""}}),
            )
            .start()
            .await;
        let api = ConfigApi::new(HttpClient::new(backend.api_base()).unwrap());

        let current = api.get_config().await.unwrap();
        assert_eq!(current.data["proxy_settings"]["enabled"], false);

        let replacement = json!({
            "proxy_settings": {"enabled": true, "url": "http://p:1"},
            "llm_settings": {"enabled": true, "provider": "aliyun", "api_key": "**********"}
        });
        api.update_config(&replacement).await.unwrap();

        let req = backend.last_request();
        assert_eq!(req.method, "PUT");
        assert_eq!(req.path, "/api/config");
        assert_eq!(req.json(), replacement);
    }
}
