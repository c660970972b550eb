#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use object_store::memory::InMemory;

use folio::application::ports::{
    CompletionRequest, Embedder, EmbedderError, LlmClient, LlmClientError, PageRasterizer,
    RasterizerError,
};
use folio::domain::{DocumentSource, Embedding, PageImage};
use folio::infrastructure::storage::ParquetSampleStore;

pub const TEST_PREFIX: &str = "rb_classification";

pub fn local_source(path: &str) -> DocumentSource {
    DocumentSource::Local(path.into())
}

pub fn memory_store() -> ParquetSampleStore {
    ParquetSampleStore::new(Arc::new(InMemory::new()), TEST_PREFIX)
}

/// Renders page `n` as the single byte `n`, so embedders can tell pages apart.
pub struct FakeRasterizer {
    total_pages: u32,
    failing_pages: HashSet<u32>,
    pub render_calls: Mutex<Vec<Vec<u32>>>,
}

impl FakeRasterizer {
    pub fn new(total_pages: u32) -> Self {
        Self {
            total_pages,
            failing_pages: HashSet::new(),
            render_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    pub fn calls(&self) -> Vec<Vec<u32>> {
        self.render_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn page_count(&self, _source: &DocumentSource) -> Result<u32, RasterizerError> {
        Ok(self.total_pages)
    }

    async fn render(
        &self,
        _source: &DocumentSource,
        pages: &[u32],
    ) -> Result<Vec<PageImage>, RasterizerError> {
        self.render_calls.lock().unwrap().push(pages.to_vec());
        if let Some(page) = pages.iter().find(|p| self.failing_pages.contains(p)) {
            return Err(RasterizerError::RenderFailed(format!("page {page} is corrupt")));
        }
        Ok(pages
            .iter()
            .map(|&page| PageImage::new(page, vec![page as u8]))
            .collect())
    }
}

/// Replies with queued responses in order, then with a fixed default.
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<Result<String, LlmClientError>>>,
    default_reply: String,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlmClient {
    pub fn answering(default_reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: default_reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then_reply(self, reply: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
        self
    }

    pub fn then_fail(self, error: LlmClientError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn recorded(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => Ok(self.default_reply.clone()),
        }
    }
}

/// Looks vectors up by the first byte of the image; unknown images fail.
pub struct LookupEmbedder {
    vectors: HashMap<u8, Vec<f32>>,
    pub calls: Mutex<usize>,
}

impl LookupEmbedder {
    pub fn new(vectors: impl IntoIterator<Item = (u8, Vec<f32>)>) -> Self {
        Self {
            vectors: vectors.into_iter().collect(),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Embedder for LookupEmbedder {
    async fn embed(&self, png: &[u8]) -> Result<Embedding, EmbedderError> {
        *self.calls.lock().unwrap() += 1;
        let key = png.first().copied().unwrap_or_default();
        self.vectors
            .get(&key)
            .map(|v| Embedding::new(v.clone()))
            .ok_or_else(|| EmbedderError::ApiRequestFailed(format!("no vector for image {key}")))
    }
}
