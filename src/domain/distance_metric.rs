use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::{Embedding, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Similarity; higher is better.
    Cosine,
    /// Distance; lower is better.
    #[serde(alias = "l2")]
    Euclidean,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
        }
    }

    pub fn score(&self, a: &Embedding, b: &Embedding) -> f32 {
        match self {
            Self::Cosine => a.cosine_similarity(b),
            Self::Euclidean => a.euclidean_distance(b),
        }
    }

    pub fn higher_is_better(&self) -> bool {
        matches!(self, Self::Cosine)
    }

    /// Whether `candidate` ranks strictly ahead of `incumbent`.
    pub fn is_better(&self, candidate: f32, incumbent: f32) -> bool {
        if self.higher_is_better() {
            candidate > incumbent
        } else {
            candidate < incumbent
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" | "l2" => Ok(Self::Euclidean),
            other => Err(ValidationError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
