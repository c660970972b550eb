use std::sync::Arc;

use crate::application::ports::{Embedder, EmbedderError, LlmClient, LlmClientError};
use crate::config::{EmbeddingsSettings, LlmSettings};

use super::{HttpEmbedder, HttpLlmClient, ModelFamily};

pub struct ClientFactory;

#[derive(Debug, thiserror::Error)]
pub enum ClientFactoryError {
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
    #[error("missing model id for {0}")]
    MissingModelId(&'static str),
    #[error("embedding dimension must be greater than zero")]
    ZeroDimension,
    #[error("llm client: {0}")]
    Llm(#[from] LlmClientError),
    #[error("embedding client: {0}")]
    Embedder(#[from] EmbedderError),
}

impl ClientFactory {
    pub fn llm(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>, ClientFactoryError> {
        if settings.api_key.is_empty() {
            return Err(ClientFactoryError::MissingApiKey("llm"));
        }
        if settings.model_id.is_empty() {
            return Err(ClientFactoryError::MissingModelId("llm"));
        }
        let family = ModelFamily::from(settings.family);
        tracing::info!(model_id = %settings.model_id, family = ?family, "Configuring model client");
        Ok(Arc::new(HttpLlmClient::new(
            &settings.endpoint,
            &settings.api_key,
            &settings.model_id,
            family,
        )?))
    }

    pub fn embedder(settings: &EmbeddingsSettings) -> Result<Arc<dyn Embedder>, ClientFactoryError> {
        if settings.api_key.is_empty() {
            return Err(ClientFactoryError::MissingApiKey("embeddings"));
        }
        if settings.model_id.is_empty() {
            return Err(ClientFactoryError::MissingModelId("embeddings"));
        }
        if settings.dimension == 0 {
            return Err(ClientFactoryError::ZeroDimension);
        }
        tracing::info!(
            model_id = %settings.model_id,
            dimension = settings.dimension,
            "Configuring embedding client"
        );
        Ok(Arc::new(HttpEmbedder::new(
            &settings.endpoint,
            &settings.api_key,
            &settings.model_id,
            settings.dimension,
        )?))
    }
}
