/// Input rejected before any rasterization, inference or storage call is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("if specific pages are provided, page number 0 is invalid; pages must be 1 or greater")]
    ZeroPageMixed,
    #[error("page {page} is outside the document (1..={total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },
    #[error(
        "cannot process {requested} pages at a time without enabling the sliding window (max {max})"
    )]
    TooManyPages { requested: usize, max: u32 },
    #[error("document has no pages")]
    EmptyDocument,
    #[error("window size must be at least 1")]
    ZeroWindowSize,
    #[error("overlap {overlap} must be smaller than the window size {window_size}")]
    OverlapNotBelowWindowSize { overlap: u32, window_size: u32 },
    #[error("sliding window overlap cannot be greater than {max}, got {overlap}")]
    OverlapAboveMax { overlap: u32, max: u32 },
    #[error("path must be a local file system path or an s3:// URI: {0}")]
    BlockedScheme(String),
    #[error("document path is empty")]
    EmptyPath,
    #[error("malformed s3 URI: {0}")]
    MalformedS3Uri(String),
    #[error("class names may only contain letters, digits or underscores: {0:?}")]
    InvalidClassLabel(String),
    #[error("invalid classifier id: {0:?}")]
    InvalidClassifierId(String),
    #[error("top_n must be between 1 and 3, got {0}")]
    TopNOutOfRange(usize),
    #[error("unknown threshold must be in [0.0, 1.0), got {0}")]
    ThresholdOutOfRange(f32),
    #[error("unknown similarity metric: {0}")]
    UnknownMetric(String),
    #[error("manifest line {line}: {reason}")]
    ManifestRow { line: usize, reason: String },
    #[error("output schema must be a JSON object")]
    InvalidOutputSchema,
    #[error("query vector has {found} dimensions but classifier samples have {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("manifest contains no samples")]
    EmptyManifest,
}
