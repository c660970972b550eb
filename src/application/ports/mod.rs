mod embedder;
mod llm_client;
mod page_rasterizer;
mod sample_store;

pub use embedder::{Embedder, EmbedderError};
pub use llm_client::{
    CompletionRequest, ContentBlock, GenerationParams, LlmClient, LlmClientError,
};
pub use page_rasterizer::{PageRasterizer, RasterizerError};
pub use sample_store::{SampleStore, SampleStoreError};
