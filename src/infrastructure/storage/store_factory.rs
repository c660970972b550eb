use std::path::PathBuf;
use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;

use crate::application::ports::{SampleStore, SampleStoreError};
use crate::config::{StorageProviderSetting, StorageSettings};

use super::parquet_sample_store::ParquetSampleStore;

pub struct SampleStoreFactory;

impl SampleStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn SampleStore>, SampleStoreError> {
        let inner = Self::object_store(settings)?;
        tracing::info!(
            provider = ?settings.provider,
            prefix = %settings.classification_prefix,
            "Sample store configured"
        );
        Ok(Arc::new(ParquetSampleStore::new(
            inner,
            settings.classification_prefix.clone(),
        )))
    }

    fn object_store(settings: &StorageSettings) -> Result<Arc<dyn ObjectStore>, SampleStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                std::fs::create_dir_all(&path)
                    .map_err(|e| SampleStoreError::Configuration(e.to_string()))?;
                let fs = LocalFileSystem::new_with_prefix(path)
                    .map_err(|e| SampleStoreError::Configuration(e.to_string()))?;
                Ok(Arc::new(fs))
            }
            StorageProviderSetting::S3 => {
                let bucket = settings.bucket.as_deref().ok_or_else(|| {
                    SampleStoreError::Configuration("storage.bucket required for s3".into())
                })?;
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(region) = settings.region.as_deref() {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = settings.endpoint.as_deref() {
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                let store = builder
                    .build()
                    .map_err(|e| SampleStoreError::Configuration(e.to_string()))?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => Ok(Arc::new(InMemory::new())),
        }
    }
}
