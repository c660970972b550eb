use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use super::bounded_batch::{ItemError, run_bounded};
use crate::application::ports::{
    Embedder, PageRasterizer, RasterizerError, SampleStore, SampleStoreError,
};
use crate::domain::{
    ClassLabel, ClassSamples, ClassSummary, ClassifierId, ManifestEntry, SampleKey,
    ValidationError,
};

pub const DEFAULT_RENDER_CONCURRENCY: usize = 4;
pub const DEFAULT_EMBED_CONCURRENCY: usize = 10;

/// Outcome of a sampling run. Failed samples are left out of the store and listed
/// here instead.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingReport {
    pub classifier_id: ClassifierId,
    pub samples_written: usize,
    pub total_rows: usize,
    pub conversion_errors: Vec<ItemError<SampleKey>>,
    pub embedding_errors: Vec<ItemError<SampleKey>>,
}

impl SamplingReport {
    pub fn is_complete(&self) -> bool {
        self.conversion_errors.is_empty() && self.embedding_errors.is_empty()
    }
}

/// Builds and inspects classifier sample stores from labelled sample pages.
pub struct SamplingService {
    rasterizer: Arc<dyn PageRasterizer>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn SampleStore>,
    render_concurrency: usize,
    embed_concurrency: usize,
}

impl SamplingService {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn SampleStore>,
    ) -> Self {
        Self {
            rasterizer,
            embedder,
            store,
            render_concurrency: DEFAULT_RENDER_CONCURRENCY,
            embed_concurrency: DEFAULT_EMBED_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, render: usize, embed: usize) -> Self {
        self.render_concurrency = render;
        self.embed_concurrency = embed;
        self
    }

    /// Embeds every manifest sample and writes them to a new classifier, or appends
    /// them to `update_id` when given.
    pub async fn run_sampling(
        &self,
        manifest: &[ManifestEntry],
        update_id: Option<ClassifierId>,
    ) -> Result<SamplingReport, SamplingError> {
        if manifest.is_empty() {
            return Err(ValidationError::EmptyManifest.into());
        }

        let update = update_id.is_some();
        let classifier_id = match update_id {
            Some(id) => {
                if !self.store.exists(&id).await? {
                    return Err(SampleStoreError::NotFound(id).into());
                }
                id
            }
            None => ClassifierId::generate(),
        };

        tracing::info!(
            classifier_id = %classifier_id,
            samples = manifest.len(),
            update,
            "Starting sampling run"
        );

        let inputs = manifest
            .iter()
            .map(|entry| (SampleKey::from(entry), entry.clone()))
            .collect();
        let rendered = run_bounded(inputs, self.render_concurrency, |entry: ManifestEntry| {
            let rasterizer = Arc::clone(&self.rasterizer);
            async move {
                let image = rasterizer
                    .render(&entry.source, &[entry.page])
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        RasterizerError::RenderFailed(format!("page {} produced no image", entry.page))
                    })?;
                Ok::<_, RasterizerError>((entry.label, image.png))
            }
        })
        .await;

        if !rendered.errors.is_empty() {
            self.save_error_report(&classifier_id, "conversion", &rendered.errors)
                .await?;
        }

        let embedded = run_bounded(
            rendered.items,
            self.embed_concurrency,
            |(label, png): (ClassLabel, Vec<u8>)| {
                let embedder = Arc::clone(&self.embedder);
                async move { embedder.embed(&png).await.map(|v| (label, v)) }
            },
        )
        .await;

        if !embedded.errors.is_empty() {
            self.save_error_report(&classifier_id, "embeddings", &embedded.errors)
                .await?;
        }

        if embedded.items.is_empty() {
            return Err(SamplingError::NoSamples {
                classifier_id,
                failed: rendered.errors.len() + embedded.errors.len(),
            });
        }

        let samples_written = embedded.items.len();
        let mut samples = ClassSamples::new();
        for (_, (label, vector)) in embedded.items {
            samples.entry(label).or_default().push(vector);
        }

        let total_rows = self.store.write(&classifier_id, &samples, update).await?;

        tracing::info!(
            classifier_id = %classifier_id,
            samples_written,
            total_rows,
            failed = rendered.errors.len() + embedded.errors.len(),
            "Sampling run complete"
        );

        Ok(SamplingReport {
            classifier_id,
            samples_written,
            total_rows,
            conversion_errors: rendered.errors,
            embedding_errors: embedded.errors,
        })
    }

    /// Class labels and their sample counts for a stored classifier.
    pub async fn view(
        &self,
        classifier_id: &ClassifierId,
    ) -> Result<Vec<ClassSummary>, SampleStoreError> {
        self.store.describe(classifier_id).await
    }

    async fn save_error_report(
        &self,
        classifier_id: &ClassifierId,
        stage: &str,
        errors: &[ItemError<SampleKey>],
    ) -> Result<(), SampleStoreError> {
        let file_name = format!("{classifier_id}_{stage}.error");
        tracing::warn!(
            classifier_id = %classifier_id,
            failed = errors.len(),
            file_name = %file_name,
            "Persisting sampling error report"
        );
        self.store
            .put_report(classifier_id, &file_name, &error_report(errors))
            .await
    }
}

/// Failures grouped by class label.
fn error_report(errors: &[ItemError<SampleKey>]) -> Value {
    let mut by_label: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
    for e in errors {
        by_label.entry(e.item.label.as_str()).or_default().push(json!({
            "file_path": e.item.file_path,
            "page": e.item.page,
            "error": e.error,
        }));
    }
    json!(by_label)
}

#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("store: {0}")]
    Store(#[from] SampleStoreError),
    #[error("no sample of classifier {classifier_id} could be embedded ({failed} failed)")]
    NoSamples {
        classifier_id: ClassifierId,
        failed: usize,
    },
}
