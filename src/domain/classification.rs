use std::collections::BTreeMap;

use serde::Serialize;

use super::{ClassLabel, Embedding};

/// Labelled sample vectors of one classifier.
pub type ClassSamples = BTreeMap<ClassLabel, Vec<Embedding>>;

pub const UNKNOWN_CLASS: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    #[serde(rename = "class")]
    pub class_label: String,
    pub score: f32,
}

impl ClassScore {
    pub fn new(class_label: impl Into<String>, score: f32) -> Self {
        Self {
            class_label: class_label.into(),
            score,
        }
    }

    pub fn unknown(score: f32) -> Self {
        Self::new(UNKNOWN_CLASS, score)
    }

    pub fn is_unknown(&self) -> bool {
        self.class_label == UNKNOWN_CLASS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageClassification {
    pub page: u32,
    pub classification: Vec<ClassScore>,
}

/// Per-label sample count of a stored classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    #[serde(rename = "class")]
    pub class_label: String,
    #[serde(rename = "num_samples")]
    pub sample_count: usize,
}
