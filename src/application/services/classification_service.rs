use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::bounded_batch::{ItemError, run_bounded};
use super::sampling_service::DEFAULT_EMBED_CONCURRENCY;
use super::similarity_classifier::{ClassifierParams, SimilarityClassifier};
use crate::application::ports::{
    Embedder, PageRasterizer, RasterizerError, SampleStore, SampleStoreError,
};
use crate::domain::{
    ClassifierId, DocumentSource, PageClassification, PageSelection, ValidationError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub classifier_id: ClassifierId,
    pub source: DocumentSource,
    pub pages: PageSelection,
    pub params: ClassifierParams,
}

/// Per-page classifications sorted by page, plus the pages that could not be embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub pages: Vec<PageClassification>,
    pub errors: Vec<ItemError<u32>>,
}

pub struct ClassificationService {
    rasterizer: Arc<dyn PageRasterizer>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn SampleStore>,
    embed_concurrency: usize,
}

impl ClassificationService {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn SampleStore>,
    ) -> Self {
        Self {
            rasterizer,
            embedder,
            store,
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }

    pub fn with_embed_concurrency(mut self, embed_concurrency: usize) -> Self {
        self.embed_concurrency = embed_concurrency;
        self
    }

    pub async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationReport, ClassificationError> {
        let classifier_id = &request.classifier_id;
        if !self.store.exists(classifier_id).await? {
            return Err(SampleStoreError::NotFound(classifier_id.clone()).into());
        }

        let total_pages = self.rasterizer.page_count(&request.source).await?;
        let pages = request
            .pages
            .resolve(total_pages, PageSelection::MAX_PAGES_PER_REQUEST)?;

        tracing::info!(
            classifier_id = %classifier_id,
            source = %request.source,
            pages = pages.len(),
            metric = %request.params.metric(),
            "Classifying document"
        );

        let images = self.rasterizer.render(&request.source, &pages).await?;
        let inputs = images
            .into_iter()
            .map(|image| (PageKey(image.page), image.png))
            .collect();
        let embedded = run_bounded(inputs, self.embed_concurrency, |png: Vec<u8>| {
            let embedder = Arc::clone(&self.embedder);
            async move { embedder.embed(&png).await }
        })
        .await;

        let samples = self.store.read(classifier_id).await?;
        let classifier = SimilarityClassifier::new(request.params);

        let mut errors: Vec<ItemError<u32>> = embedded
            .errors
            .into_iter()
            .map(|e| ItemError {
                item: e.item.0,
                error: e.error,
            })
            .collect();

        let expected = samples.values().flatten().next().map(|v| v.dimensions());
        let mut classified = Vec::with_capacity(embedded.items.len());
        for (PageKey(page), vector) in &embedded.items {
            match expected {
                Some(expected) if vector.dimensions() != expected => {
                    let mismatch = ValidationError::DimensionMismatch {
                        expected,
                        found: vector.dimensions(),
                    };
                    tracing::error!(
                        classifier_id = %classifier_id,
                        page,
                        error = %mismatch,
                        "Query embedding does not match classifier samples"
                    );
                    errors.push(ItemError {
                        item: *page,
                        error: format!("Error processing {}: {mismatch}", PageKey(*page)),
                    });
                }
                _ => classified.push(classifier.classify(*page, vector, &samples)),
            }
        }
        classified.sort_by_key(|c: &PageClassification| c.page);
        errors.sort_by_key(|e| e.item);

        Ok(ClassificationReport {
            pages: classified,
            errors,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct PageKey(u32);

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("rasterizer: {0}")]
    Rasterizer(#[from] RasterizerError),
    #[error("store: {0}")]
    Store(#[from] SampleStoreError),
}
