use serde::Serialize;

use super::{ModelResponse, WindowResult};

/// Final result of a document analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// A single response: the only window's result, a non-windowed request, or the
    /// empty fallback when no window ran.
    Direct(ModelResponse),
    /// A second-pass answer over several windows, with the raw per-window output kept.
    Synthesized {
        synthesized_response: ModelResponse,
        window_results: Vec<WindowResult>,
    },
}

impl Answer {
    pub fn response(&self) -> &ModelResponse {
        match self {
            Self::Direct(response) => response,
            Self::Synthesized {
                synthesized_response,
                ..
            } => synthesized_response,
        }
    }
}
