use std::fmt;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::ValidationError;

const ID_PREFIX: &str = "rb_classifier_";

/// Name under which a classifier's sample table is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClassifierId(String);

impl ClassifierId {
    /// `rb_classifier_<unix seconds>_<8 hex chars>`; the random suffix keeps
    /// classifiers created within the same second apart.
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{ID_PREFIX}{}_{}",
            Utc::now().timestamp(),
            &suffix[..8]
        ))
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ValidationError::InvalidClassifierId(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
