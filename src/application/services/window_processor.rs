use std::sync::Arc;

use crate::application::ports::{
    CompletionRequest, ContentBlock, GenerationParams, LlmClient, LlmClientError, PageRasterizer,
    RasterizerError,
};
use crate::domain::{
    DocumentSource, ModelResponse, OutputSchema, PageImage, ValidationError, WindowInfo,
    WindowManager, WindowResult,
};
use crate::infrastructure::observability::sanitize_prompt;

/// The question and instructions sent with every window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTask {
    pub question: String,
    pub system_prompt: String,
    pub params: GenerationParams,
    pub output_schema: Option<OutputSchema>,
}

impl WindowTask {
    /// Per-window user text: the question, the visible page range and, when set, the
    /// schema instructions around both.
    pub fn window_prompt(&self, window: &WindowInfo) -> String {
        let note = window_note(&self.question, window);
        match &self.output_schema {
            Some(schema) => schema.apply(&note),
            None => note,
        }
    }
}

/// Sends each window of a document to the model, one request per window.
pub struct WindowProcessor {
    rasterizer: Arc<dyn PageRasterizer>,
    llm_client: Arc<dyn LlmClient>,
}

impl WindowProcessor {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, llm_client: Arc<dyn LlmClient>) -> Self {
        Self {
            rasterizer,
            llm_client,
        }
    }

    /// Renders exactly the pages of `window` and asks the model about them.
    pub async fn process(
        &self,
        source: &DocumentSource,
        window: WindowInfo,
        task: &WindowTask,
    ) -> Result<WindowResult, WindowError> {
        let pages: Vec<u32> = window.pages().collect();
        let images = self
            .rasterizer
            .render(source, &pages)
            .await
            .map_err(|e| WindowError::Render {
                window_start: window.window_start,
                window_end: window.window_end,
                source: e,
            })?;

        let request = build_window_request(images, &window, task);

        tracing::debug!(
            window_start = window.window_start,
            window_end = window.window_end,
            images = request.image_count(),
            question = %sanitize_prompt(&task.question),
            "Invoking model for window"
        );

        let raw = self
            .llm_client
            .complete(&request)
            .await
            .map_err(|e| WindowError::Invocation {
                window_start: window.window_start,
                window_end: window.window_end,
                source: e,
            })?;

        Ok(WindowResult::new(window, ModelResponse::from_completion(&raw)))
    }

    /// Walks the whole document from page 1, window by window, in order.
    ///
    /// Windows run sequentially and the first failure aborts the run; no partial
    /// results are returned.
    pub async fn process_document(
        &self,
        source: &DocumentSource,
        manager: &mut WindowManager,
        overlap: u32,
        task: &WindowTask,
    ) -> Result<Vec<WindowResult>, WindowError> {
        manager.check_overlap(overlap)?;
        manager.reset();

        tracing::info!(
            source = %source,
            total_pages = manager.total_pages(),
            window_size = manager.window_size(),
            overlap,
            "Starting sliding window run"
        );

        let mut results = Vec::new();
        loop {
            let window = manager.window_info();
            tracing::info!(
                window_start = window.window_start,
                window_end = window.window_end,
                "Processing window"
            );

            results.push(self.process(source, window, task).await?);

            if !manager.advance(overlap)? {
                break;
            }
        }

        tracing::info!(windows = results.len(), "Sliding window run complete");
        Ok(results)
    }
}

/// Appends the visible page range to the user's question.
pub fn window_note(question: &str, window: &WindowInfo) -> String {
    format!(
        "{question}\n\nNote: You are currently viewing pages {} to {} of {} total pages.",
        window.window_start, window.window_end, window.total_pages
    )
}

fn build_window_request(
    images: Vec<PageImage>,
    window: &WindowInfo,
    task: &WindowTask,
) -> CompletionRequest {
    let mut content = page_blocks(images);
    content.push(ContentBlock::Text(task.window_prompt(window)));

    CompletionRequest {
        system_prompt: task.system_prompt.clone(),
        content,
        params: task.params,
    }
}

/// Each page image preceded by a `Page: n` label.
pub(super) fn page_blocks(images: Vec<PageImage>) -> Vec<ContentBlock> {
    let mut content = Vec::with_capacity(images.len() * 2 + 1);
    for image in images {
        content.push(ContentBlock::Text(format!("Page: {}", image.page)));
        content.push(ContentBlock::Image(image));
    }
    content
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("invalid window configuration: {0}")]
    Validation(#[from] ValidationError),
    #[error("rendering pages {window_start}-{window_end}: {source}")]
    Render {
        window_start: u32,
        window_end: u32,
        source: RasterizerError,
    },
    #[error("model invocation for pages {window_start}-{window_end}: {source}")]
    Invocation {
        window_start: u32,
        window_end: u32,
        source: LlmClientError,
    },
}
