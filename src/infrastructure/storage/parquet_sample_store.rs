use std::sync::Arc;

use arrow_array::builder::{Float32Builder, ListBuilder};
use arrow_array::cast::AsArray;
use arrow_array::types::{Float32Type, Float64Type};
use arrow_array::{ArrayRef, RecordBatch, StringArray};
use bytes::Bytes;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value;

use crate::application::ports::{SampleStore, SampleStoreError};
use crate::domain::{ClassLabel, ClassSamples, ClassSummary, ClassifierId, Embedding, StoragePath};

const CLASSIFIER_COLUMN: &str = "classifier";
const CLASS_COLUMN: &str = "class";
const VECTOR_COLUMN: &str = "vector";

/// Sample tables stored as one Parquet object per classifier under
/// `<prefix>/<id>/<id>.parquet`, with sibling JSON reports.
pub struct ParquetSampleStore {
    inner: Arc<dyn ObjectStore>,
    prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
struct SampleRow {
    class_label: ClassLabel,
    vector: Embedding,
}

impl ParquetSampleStore {
    pub fn new(inner: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn table_path(&self, classifier_id: &ClassifierId) -> StorePath {
        StorePath::from(StoragePath::sample_table(&self.prefix, classifier_id).as_str())
    }

    async fn load_rows(
        &self,
        classifier_id: &ClassifierId,
    ) -> Result<Vec<SampleRow>, SampleStoreError> {
        let path = self.table_path(classifier_id);
        let result = match self.inner.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(SampleStoreError::NotFound(classifier_id.clone()));
            }
            Err(e) => return Err(SampleStoreError::DownloadFailed(e.to_string())),
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|e| SampleStoreError::DownloadFailed(e.to_string()))?;

        decode_rows(bytes)
    }
}

#[async_trait::async_trait]
impl SampleStore for ParquetSampleStore {
    async fn exists(&self, classifier_id: &ClassifierId) -> Result<bool, SampleStoreError> {
        match self.inner.head(&self.table_path(classifier_id)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(SampleStoreError::DownloadFailed(e.to_string())),
        }
    }

    async fn write(
        &self,
        classifier_id: &ClassifierId,
        samples: &ClassSamples,
        update: bool,
    ) -> Result<usize, SampleStoreError> {
        let mut rows = if update {
            self.load_rows(classifier_id).await?
        } else {
            Vec::new()
        };

        for (label, vectors) in samples {
            rows.extend(vectors.iter().map(|vector| SampleRow {
                class_label: label.clone(),
                vector: vector.clone(),
            }));
        }
        check_dimensions(&rows)?;

        let encoded = encode_rows(classifier_id, &rows)?;
        let path = self.table_path(classifier_id);
        self.inner
            .put(&path, PutPayload::from(encoded))
            .await
            .map_err(|e| SampleStoreError::UploadFailed(e.to_string()))?;

        tracing::info!(
            classifier_id = %classifier_id,
            path = %path,
            rows = rows.len(),
            update,
            "Sample table written"
        );

        Ok(rows.len())
    }

    async fn read(&self, classifier_id: &ClassifierId) -> Result<ClassSamples, SampleStoreError> {
        let mut samples = ClassSamples::new();
        for row in self.load_rows(classifier_id).await? {
            samples.entry(row.class_label).or_default().push(row.vector);
        }
        Ok(samples)
    }

    async fn describe(
        &self,
        classifier_id: &ClassifierId,
    ) -> Result<Vec<ClassSummary>, SampleStoreError> {
        let rows = self.load_rows(classifier_id).await?;

        // Grouped in order of first appearance in the table.
        let mut summaries: Vec<ClassSummary> = Vec::new();
        for row in &rows {
            match summaries
                .iter_mut()
                .find(|s| s.class_label == row.class_label.as_str())
            {
                Some(summary) => summary.sample_count += 1,
                None => summaries.push(ClassSummary {
                    class_label: row.class_label.to_string(),
                    sample_count: 1,
                }),
            }
        }
        Ok(summaries)
    }

    async fn put_report(
        &self,
        classifier_id: &ClassifierId,
        file_name: &str,
        report: &Value,
    ) -> Result<(), SampleStoreError> {
        let body =
            serde_json::to_vec(report).map_err(|e| SampleStoreError::Encoding(e.to_string()))?;
        let path = StorePath::from(StoragePath::artifact(&self.prefix, classifier_id, file_name).as_str());
        self.inner
            .put(&path, PutPayload::from(body))
            .await
            .map_err(|e| SampleStoreError::UploadFailed(e.to_string()))?;
        Ok(())
    }
}

fn check_dimensions(rows: &[SampleRow]) -> Result<(), SampleStoreError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let expected = first.vector.dimensions();
    match rows.iter().find(|r| r.vector.dimensions() != expected) {
        Some(row) => Err(SampleStoreError::DimensionMismatch {
            expected,
            found: row.vector.dimensions(),
        }),
        None => Ok(()),
    }
}

fn encode_rows(classifier_id: &ClassifierId, rows: &[SampleRow]) -> Result<Vec<u8>, SampleStoreError> {
    let classifier =
        StringArray::from_iter_values(std::iter::repeat_n(classifier_id.as_str(), rows.len()));
    let classes = StringArray::from_iter_values(rows.iter().map(|r| r.class_label.as_str()));

    let mut vectors = ListBuilder::new(Float32Builder::new());
    for row in rows {
        vectors.values().append_slice(&row.vector.values);
        vectors.append(true);
    }

    let batch = RecordBatch::try_from_iter([
        (CLASSIFIER_COLUMN, Arc::new(classifier) as ArrayRef),
        (CLASS_COLUMN, Arc::new(classes) as ArrayRef),
        (VECTOR_COLUMN, Arc::new(vectors.finish()) as ArrayRef),
    ])
    .map_err(|e| SampleStoreError::Encoding(e.to_string()))?;

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), None)
        .map_err(|e| SampleStoreError::Encoding(e.to_string()))?;
    writer
        .write(&batch)
        .map_err(|e| SampleStoreError::Encoding(e.to_string()))?;
    writer
        .close()
        .map_err(|e| SampleStoreError::Encoding(e.to_string()))?;

    Ok(buffer)
}

fn decode_rows(bytes: Bytes) -> Result<Vec<SampleRow>, SampleStoreError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)
        .and_then(|builder| builder.build())
        .map_err(|e| SampleStoreError::Decoding(e.to_string()))?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| SampleStoreError::Decoding(e.to_string()))?;

        let classes = batch
            .column_by_name(CLASS_COLUMN)
            .and_then(|c| c.as_string_opt::<i32>())
            .ok_or_else(|| missing_column(CLASS_COLUMN))?;
        let vectors = batch
            .column_by_name(VECTOR_COLUMN)
            .and_then(|c| c.as_list_opt::<i32>())
            .ok_or_else(|| missing_column(VECTOR_COLUMN))?;

        for i in 0..batch.num_rows() {
            let class_label = ClassLabel::new(classes.value(i))
                .map_err(|e| SampleStoreError::Decoding(e.to_string()))?;
            let values = vectors.value(i);
            // Tables written by other tools may hold double precision vectors.
            let vector = if let Some(values) = values.as_primitive_opt::<Float32Type>() {
                values.values().to_vec()
            } else if let Some(values) = values.as_primitive_opt::<Float64Type>() {
                values.values().iter().map(|&v| v as f32).collect()
            } else {
                return Err(missing_column(VECTOR_COLUMN));
            };

            rows.push(SampleRow {
                class_label,
                vector: Embedding::new(vector),
            });
        }
    }

    Ok(rows)
}

fn missing_column(name: &str) -> SampleStoreError {
    SampleStoreError::Decoding(format!("column {name:?} is missing or has an unexpected type"))
}
