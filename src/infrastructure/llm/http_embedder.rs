use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

/// Multimodal image embedding model behind `POST {endpoint}/model/{model_id}/invoke`.
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model_id: String,
    dimension: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingRequest {
    input_image: String,
    embedding_config: EmbeddingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingConfig {
    output_embedding_length: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        model_id: &str,
        dimension: usize,
    ) -> Result<Self, EmbedderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| EmbedderError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model_id: model_id.to_string(),
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, png: &[u8]) -> Result<Embedding, EmbedderError> {
        let request_body = EmbeddingRequest {
            input_image: general_purpose::STANDARD.encode(png),
            embedding_config: EmbeddingConfig {
                output_embedding_length: self.dimension,
            },
        };

        let response = self
            .client
            .post(format!("{}/model/{}/invoke", self.endpoint, self.model_id))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbedderError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedderError::InvalidResponse(e.to_string()))?;

        if embedding_response.embedding.len() != self.dimension {
            return Err(EmbedderError::InvalidResponse(format!(
                "expected {} dimensions, got {}",
                self.dimension,
                embedding_response.embedding.len()
            )));
        }

        Ok(Embedding::new(embedding_response.embedding))
    }
}
