use std::fmt;

use super::ClassifierId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub const TABLE_EXTENSION: &'static str = "parquet";

    /// `<prefix>/<id>/<id>.parquet`
    pub fn sample_table(prefix: &str, classifier_id: &ClassifierId) -> Self {
        Self::artifact(
            prefix,
            classifier_id,
            &format!("{classifier_id}.{}", Self::TABLE_EXTENSION),
        )
    }

    /// A sibling file stored next to the sample table.
    pub fn artifact(prefix: &str, classifier_id: &ClassifierId, file_name: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Self(format!("{classifier_id}/{file_name}"))
        } else {
            Self(format!("{prefix}/{classifier_id}/{file_name}"))
        }
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
