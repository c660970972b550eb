use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ClassSamples, ClassSummary, ClassifierId};

/// Persisted `(class label, vector)` rows, one table per classifier.
///
/// Every write replaces the classifier's whole table. Concurrent `update` writes to
/// the same classifier are not coordinated; the last writer wins.
#[async_trait]
pub trait SampleStore: Send + Sync {
    async fn exists(&self, classifier_id: &ClassifierId) -> Result<bool, SampleStoreError>;

    /// Writes `samples`. With `update` the existing rows are read first and kept;
    /// returns the number of rows in the table afterwards.
    async fn write(
        &self,
        classifier_id: &ClassifierId,
        samples: &ClassSamples,
        update: bool,
    ) -> Result<usize, SampleStoreError>;

    async fn read(&self, classifier_id: &ClassifierId) -> Result<ClassSamples, SampleStoreError>;

    async fn describe(
        &self,
        classifier_id: &ClassifierId,
    ) -> Result<Vec<ClassSummary>, SampleStoreError>;

    /// Stores a JSON document next to the classifier's table.
    async fn put_report(
        &self,
        classifier_id: &ClassifierId,
        file_name: &str,
        report: &Value,
    ) -> Result<(), SampleStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SampleStoreError {
    #[error(
        "classifier {0} does not exist; check the storage bucket or create a new classifier"
    )]
    NotFound(ClassifierId),
    #[error("vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("encoding failed: {0}")]
    Encoding(String),
    #[error("decoding failed: {0}")]
    Decoding(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("store configuration: {0}")]
    Configuration(String),
}
