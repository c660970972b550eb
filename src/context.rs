use std::sync::Arc;

use crate::application::ports::{
    Embedder, GenerationParams, LlmClient, PageRasterizer, SampleStore, SampleStoreError,
};
use crate::application::services::{
    AnalysisRequest, ClassificationService, ClassifierParams, DocumentAnalysisService,
    SamplingService,
};
use crate::config::Settings;
use crate::domain::{DocumentSource, ValidationError};
use crate::infrastructure::llm::{ClientFactory, ClientFactoryError};
use crate::infrastructure::storage::SampleStoreFactory;

/// The services wired against one set of settings.
pub struct AppContext {
    pub settings: Settings,
    pub analysis: DocumentAnalysisService,
    pub sampling: SamplingService,
    pub classification: ClassificationService,
}

impl AppContext {
    /// Builds HTTP model clients and the sample store from `settings`. Page
    /// rendering is supplied by the caller.
    pub fn from_settings(
        settings: Settings,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Result<Self, BootstrapError> {
        let llm_client = ClientFactory::llm(&settings.llm)?;
        let embedder = ClientFactory::embedder(&settings.embeddings)?;
        let store = SampleStoreFactory::create(&settings.storage)?;
        Self::with_adapters(settings, rasterizer, llm_client, embedder, store)
    }

    pub fn with_adapters(
        settings: Settings,
        rasterizer: Arc<dyn PageRasterizer>,
        llm_client: Arc<dyn LlmClient>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn SampleStore>,
    ) -> Result<Self, BootstrapError> {
        let windowing = &settings.windowing;
        if windowing.window_size == 0 {
            return Err(ValidationError::ZeroWindowSize.into());
        }
        if windowing.overlap > windowing.max_overlap {
            return Err(ValidationError::OverlapAboveMax {
                overlap: windowing.overlap,
                max: windowing.max_overlap,
            }
            .into());
        }
        if windowing.overlap >= windowing.window_size {
            return Err(ValidationError::OverlapNotBelowWindowSize {
                overlap: windowing.overlap,
                window_size: windowing.window_size,
            }
            .into());
        }

        let classification = &settings.classification;
        // Fail on bad classification defaults at startup rather than per request.
        ClassifierParams::new(
            classification.metric,
            classification.top_n,
            classification.unknown_threshold,
        )?;

        let analysis = DocumentAnalysisService::new(
            Arc::clone(&rasterizer),
            llm_client,
            windowing.window_size,
            windowing.max_overlap,
        );
        let sampling = SamplingService::new(
            Arc::clone(&rasterizer),
            Arc::clone(&embedder),
            Arc::clone(&store),
        )
        .with_concurrency(
            classification.render_concurrency,
            classification.embed_concurrency,
        );
        let classification_service = ClassificationService::new(rasterizer, embedder, store)
            .with_embed_concurrency(classification.embed_concurrency);

        Ok(Self {
            analysis,
            sampling,
            classification: classification_service,
            settings,
        })
    }

    /// A request carrying the configured generation parameters and window overlap.
    pub fn analysis_request(
        &self,
        source: DocumentSource,
        question: impl Into<String>,
    ) -> AnalysisRequest {
        let mut request = AnalysisRequest::new(source, question);
        request.params = GenerationParams {
            max_tokens: self.settings.llm.max_tokens,
            temperature: self.settings.llm.temperature,
        };
        request.sliding_window_overlap = self.settings.windowing.overlap;
        request
    }

    /// Scoring parameters from the `classification` settings.
    pub fn default_classifier_params(&self) -> Result<ClassifierParams, ValidationError> {
        let classification = &self.settings.classification;
        ClassifierParams::new(
            classification.metric,
            classification.top_n,
            classification.unknown_threshold,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("client: {0}")]
    Client(#[from] ClientFactoryError),
    #[error("storage: {0}")]
    Storage(#[from] SampleStoreError),
    #[error("settings: {0}")]
    Settings(#[from] ValidationError),
}
