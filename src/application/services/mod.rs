mod bounded_batch;
mod classification_service;
mod document_analysis_service;
mod result_synthesizer;
mod sampling_service;
mod similarity_classifier;
mod window_processor;

pub use bounded_batch::{BatchOutcome, ItemError, run_bounded};
pub use classification_service::{
    ClassificationError, ClassificationReport, ClassificationRequest, ClassificationService,
};
pub use document_analysis_service::{AnalysisError, AnalysisRequest, DocumentAnalysisService};
pub use result_synthesizer::{ResultSynthesizer, combine_mechanically};
pub use sampling_service::{
    DEFAULT_EMBED_CONCURRENCY, DEFAULT_RENDER_CONCURRENCY, SamplingError, SamplingReport,
    SamplingService,
};
pub use similarity_classifier::{ClassifierParams, MAX_TOP_N, SimilarityClassifier};
pub use window_processor::{WindowError, WindowProcessor, WindowTask, window_note};
