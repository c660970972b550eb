use async_trait::async_trait;

use crate::domain::{DocumentSource, PageImage};

/// Renders document pages to PNG images. Page numbers are 1-based.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn page_count(&self, source: &DocumentSource) -> Result<u32, RasterizerError>;

    async fn render(
        &self,
        source: &DocumentSource,
        pages: &[u32],
    ) -> Result<Vec<PageImage>, RasterizerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RasterizerError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("render failed: {0}")]
    RenderFailed(String),
}
