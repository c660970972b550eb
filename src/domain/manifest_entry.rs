use std::fmt;

use serde::Serialize;

use super::{ClassLabel, DocumentSource};

/// One training sample: a page of a document that exemplifies a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub label: ClassLabel,
    pub source: DocumentSource,
    pub page: u32,
}

/// Identity of a sample within a sampling run, used to report per-item failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SampleKey {
    pub label: String,
    pub file_path: String,
    pub page: u32,
}

impl From<&ManifestEntry> for SampleKey {
    fn from(entry: &ManifestEntry) -> Self {
        Self {
            label: entry.label.to_string(),
            file_path: entry.source.to_string(),
            page: entry.page,
        }
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} page {}", self.file_path, self.page)
    }
}
