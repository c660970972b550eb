mod parquet_sample_store;
mod store_factory;

pub use parquet_sample_store::ParquetSampleStore;
pub use store_factory::SampleStoreFactory;
