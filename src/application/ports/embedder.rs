use async_trait::async_trait;

use crate::domain::Embedding;

/// Multimodal embedding model taking a single page image.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, png: &[u8]) -> Result<Embedding, EmbedderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedderError {
    #[error("embedding api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("embedding rate limited")]
    RateLimited,
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
    #[error("http client setup failed: {0}")]
    ClientBuild(String),
}
