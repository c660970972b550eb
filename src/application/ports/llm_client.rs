use async_trait::async_trait;

use crate::domain::PageImage;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one independent completion request and returns the raw model text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub content: Vec<ContentBlock>,
    pub params: GenerationParams,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    Image(PageImage),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.0,
        }
    }
}

impl CompletionRequest {
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .filter(|block| matches!(block, ContentBlock::Image(_)))
            .count()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("http client setup failed: {0}")]
    ClientBuild(String),
}
