mod answer;
mod class_label;
mod classification;
mod classifier_id;
mod distance_metric;
mod document_source;
mod embedding;
mod manifest_entry;
mod model_response;
mod output_schema;
mod page_image;
mod page_selection;
mod storage_path;
mod validation_error;
mod window_manager;
mod window_result;

pub use answer::Answer;
pub use class_label::ClassLabel;
pub use classification::{ClassSamples, ClassScore, ClassSummary, PageClassification, UNKNOWN_CLASS};
pub use classifier_id::ClassifierId;
pub use distance_metric::DistanceMetric;
pub use document_source::DocumentSource;
pub use embedding::Embedding;
pub use manifest_entry::{ManifestEntry, SampleKey};
pub use model_response::ModelResponse;
pub use output_schema::OutputSchema;
pub use page_image::PageImage;
pub use page_selection::PageSelection;
pub use storage_path::StoragePath;
pub use validation_error::ValidationError;
pub use window_manager::{WindowInfo, WindowManager};
pub use window_result::WindowResult;
