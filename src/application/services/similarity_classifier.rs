use std::cmp::Ordering;

use crate::domain::{
    ClassSamples, ClassScore, DistanceMetric, Embedding, PageClassification, ValidationError,
};

pub const MAX_TOP_N: usize = 3;

/// Validated scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierParams {
    metric: DistanceMetric,
    top_n: usize,
    unknown_threshold: f32,
}

impl ClassifierParams {
    pub fn new(
        metric: DistanceMetric,
        top_n: usize,
        unknown_threshold: f32,
    ) -> Result<Self, ValidationError> {
        if !(1..=MAX_TOP_N).contains(&top_n) {
            return Err(ValidationError::TopNOutOfRange(top_n));
        }
        if !(0.0..1.0).contains(&unknown_threshold) {
            return Err(ValidationError::ThresholdOutOfRange(unknown_threshold));
        }
        Ok(Self {
            metric,
            top_n,
            unknown_threshold,
        })
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn unknown_threshold(&self) -> f32 {
        self.unknown_threshold
    }
}

/// Nearest-sample classifier over a labelled vector store.
///
/// A label scores as its best matching sample: maximum cosine similarity or minimum
/// euclidean distance. When even the best label misses the threshold the page is
/// reported as [`crate::domain::UNKNOWN_CLASS`] with the raw best score.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityClassifier {
    params: ClassifierParams,
}

impl SimilarityClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> ClassifierParams {
        self.params
    }

    pub fn classify(
        &self,
        page: u32,
        query: &Embedding,
        samples: &ClassSamples,
    ) -> PageClassification {
        let metric = self.params.metric;

        let mut scores: Vec<(&str, f32)> = samples
            .iter()
            .filter_map(|(label, vectors)| {
                best_score(metric, query, vectors).map(|score| (label.as_str(), score))
            })
            .collect();

        // Stable sort keeps label order among ties.
        scores.sort_by(|a, b| rank(metric, a.1, b.1));

        let Some(&(_, best)) = scores.first() else {
            return PageClassification {
                page,
                classification: Vec::new(),
            };
        };

        if self.is_unknown(best) {
            return PageClassification {
                page,
                classification: vec![ClassScore::unknown(best)],
            };
        }

        let classification = scores
            .into_iter()
            .take(self.params.top_n)
            .map(|(label, score)| ClassScore::new(label, round_score(score)))
            .collect();

        PageClassification {
            page,
            classification,
        }
    }

    /// Equality with the threshold is never unknown.
    fn is_unknown(&self, best: f32) -> bool {
        match self.params.metric {
            DistanceMetric::Cosine => best < self.params.unknown_threshold,
            DistanceMetric::Euclidean => best > self.params.unknown_threshold,
        }
    }
}

fn best_score(metric: DistanceMetric, query: &Embedding, vectors: &[Embedding]) -> Option<f32> {
    vectors
        .iter()
        .map(|v| metric.score(query, v))
        .reduce(|best, s| if metric.is_better(s, best) { s } else { best })
}

fn rank(metric: DistanceMetric, a: f32, b: f32) -> Ordering {
    let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    if metric.higher_is_better() {
        ordering.reverse()
    } else {
        ordering
    }
}

fn round_score(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}
