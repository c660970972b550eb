use serde::Serialize;

use super::{ModelResponse, WindowInfo};

/// A model response tagged with the window it was produced from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowResult {
    pub window: WindowInfo,
    pub response: ModelResponse,
}

impl WindowResult {
    pub fn new(window: WindowInfo, response: ModelResponse) -> Self {
        Self { window, response }
    }
}
