use std::sync::Arc;

use super::result_synthesizer::ResultSynthesizer;
use super::window_processor::{WindowError, WindowProcessor, WindowTask, page_blocks};
use crate::application::ports::{
    CompletionRequest, ContentBlock, GenerationParams, LlmClient, LlmClientError, PageRasterizer,
    RasterizerError,
};
use crate::domain::{
    Answer, DocumentSource, ModelResponse, OutputSchema, PageSelection, ValidationError,
    WindowManager,
};
use crate::infrastructure::observability::sanitize_prompt;

/// A question about one document.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub source: DocumentSource,
    pub question: String,
    pub system_prompt: String,
    pub pages: PageSelection,
    /// `0` sends the selected pages in a single request; anything above walks the
    /// whole document in overlapping windows.
    pub sliding_window_overlap: u32,
    pub params: GenerationParams,
    /// Applied to every window request and to the synthesis request.
    pub output_schema: Option<OutputSchema>,
}

impl AnalysisRequest {
    pub fn new(source: DocumentSource, question: impl Into<String>) -> Self {
        Self {
            source,
            question: question.into(),
            system_prompt: String::new(),
            pages: PageSelection::All,
            sliding_window_overlap: 0,
            params: GenerationParams::default(),
            output_schema: None,
        }
    }

    /// The question as asked of the model, after any rephrasing the schema carries.
    pub fn effective_question(&self) -> &str {
        match &self.output_schema {
            Some(schema) => schema.question(&self.question),
            None => &self.question,
        }
    }
}

/// Answers questions about documents, switching to sliding windows for documents
/// larger than one request can carry.
pub struct DocumentAnalysisService {
    rasterizer: Arc<dyn PageRasterizer>,
    llm_client: Arc<dyn LlmClient>,
    processor: WindowProcessor,
    synthesizer: ResultSynthesizer,
    window_size: u32,
    max_overlap: u32,
}

impl DocumentAnalysisService {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        llm_client: Arc<dyn LlmClient>,
        window_size: u32,
        max_overlap: u32,
    ) -> Self {
        Self {
            processor: WindowProcessor::new(Arc::clone(&rasterizer), Arc::clone(&llm_client)),
            synthesizer: ResultSynthesizer::new(Arc::clone(&llm_client)),
            rasterizer,
            llm_client,
            window_size,
            max_overlap,
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Answer, AnalysisError> {
        self.validate(request)?;

        tracing::info!(
            source = %request.source,
            overlap = request.sliding_window_overlap,
            question = %sanitize_prompt(&request.question),
            "Analyzing document"
        );

        if request.sliding_window_overlap > 0 {
            self.analyze_windowed(request).await
        } else {
            self.analyze_single(request).await
        }
    }

    fn validate(&self, request: &AnalysisRequest) -> Result<(), ValidationError> {
        let overlap = request.sliding_window_overlap;
        if overlap > self.max_overlap {
            return Err(ValidationError::OverlapAboveMax {
                overlap,
                max: self.max_overlap,
            });
        }

        if overlap > 0 {
            if self.window_size == 0 {
                return Err(ValidationError::ZeroWindowSize);
            }
            if overlap >= self.window_size {
                return Err(ValidationError::OverlapNotBelowWindowSize {
                    overlap,
                    window_size: self.window_size,
                });
            }
        } else if let Some(requested) = request.pages.explicit_len() {
            if requested > self.window_size as usize {
                return Err(ValidationError::TooManyPages {
                    requested,
                    max: self.window_size,
                });
            }
        }

        Ok(())
    }

    async fn analyze_windowed(&self, request: &AnalysisRequest) -> Result<Answer, AnalysisError> {
        let total_pages = self.rasterizer.page_count(&request.source).await?;
        let mut manager = WindowManager::new(total_pages, self.window_size)?;

        let task = WindowTask {
            question: request.effective_question().to_string(),
            system_prompt: request.system_prompt.clone(),
            params: request.params,
            output_schema: request.output_schema.clone(),
        };
        let results = self
            .processor
            .process_document(
                &request.source,
                &mut manager,
                request.sliding_window_overlap,
                &task,
            )
            .await?;

        self.synthesizer
            .combine(
                request.effective_question(),
                results,
                request.params,
                request.output_schema.as_ref(),
            )
            .await
            .map_err(AnalysisError::Synthesis)
    }

    async fn analyze_single(&self, request: &AnalysisRequest) -> Result<Answer, AnalysisError> {
        let total_pages = self.rasterizer.page_count(&request.source).await?;
        let pages = request.pages.resolve(total_pages, self.window_size)?;

        let images = self.rasterizer.render(&request.source, &pages).await?;
        let mut content = page_blocks(images);
        let question = match &request.output_schema {
            Some(schema) => schema.apply(request.effective_question()),
            None => request.question.clone(),
        };
        content.push(ContentBlock::Text(question));

        let completion = CompletionRequest {
            system_prompt: request.system_prompt.clone(),
            content,
            params: request.params,
        };
        let raw = self
            .llm_client
            .complete(&completion)
            .await
            .map_err(AnalysisError::Invocation)?;

        Ok(Answer::Direct(ModelResponse::from_completion(&raw)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("rasterizer: {0}")]
    Rasterizer(#[from] RasterizerError),
    #[error("window: {0}")]
    Window(#[from] WindowError),
    #[error("invocation: {0}")]
    Invocation(LlmClientError),
    #[error("synthesis: {0}")]
    Synthesis(LlmClientError),
}
