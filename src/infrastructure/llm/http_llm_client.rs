use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::model_family::ModelFamily;
use crate::application::ports::{CompletionRequest, LlmClient, LlmClientError};

/// Invokes a hosted multimodal model over `POST {endpoint}/model/{model_id}/invoke`.
pub struct HttpLlmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model_id: String,
    family: ModelFamily,
}

impl HttpLlmClient {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(
        endpoint: &str,
        api_key: &str,
        model_id: &str,
        family: ModelFamily,
    ) -> Result<Self, LlmClientError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmClientError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model_id: model_id.to_string(),
            family,
        })
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        let url = format!("{}/model/{}/invoke", self.endpoint, self.model_id);
        let body = self.family.encode(request);

        tracing::debug!(
            model_id = %self.model_id,
            family = ?self.family,
            images = request.image_count(),
            max_tokens = request.params.max_tokens,
            "Invoking model"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        self.family.decode(&raw).inspect_err(|e| {
            tracing::error!(
                model_id = %self.model_id,
                raw_response = %String::from_utf8_lossy(&raw),
                error = %e,
                "Failed to parse model response"
            );
        })
    }
}
