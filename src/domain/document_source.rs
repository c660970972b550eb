use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::ValidationError;

const BLOCKED_SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];
const S3_SCHEME: &str = "s3://";

/// Location of a document: a local path or an object in S3.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentSource {
    Local(PathBuf),
    S3 { bucket: String, key: String },
}

impl DocumentSource {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let lowered = trimmed.to_ascii_lowercase();

        if BLOCKED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
            return Err(ValidationError::BlockedScheme(trimmed.to_string()));
        }

        if lowered.starts_with(S3_SCHEME) {
            let rest = &trimmed[S3_SCHEME.len()..];
            return match rest.split_once('/') {
                Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self::S3 {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }),
                _ => Err(ValidationError::MalformedS3Uri(trimmed.to_string())),
            };
        }

        if trimmed.is_empty() {
            return Err(ValidationError::EmptyPath);
        }

        Ok(Self::Local(PathBuf::from(trimmed)))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::S3 { .. })
    }
}

impl FromStr for DocumentSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
        }
    }
}
