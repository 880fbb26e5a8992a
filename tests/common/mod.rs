//! Shared test helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use embedbase::application::settings::Settings;
use embedbase::domain::entities::document::Metadata;
use embedbase::domain::entities::stored_vector::Embedding;
use embedbase::domain::error::DomainError;
use embedbase::domain::ports::embedding_port::Embedder;
use embedbase::infrastructure::embeddings::hashing::HashingEmbedder;
use embedbase::infrastructure::memory::vector_store::InMemoryVectorStore;
use embedbase::Embedbase;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Embedder with hand-picked vectors for known texts; other texts are feature-hashed.
pub struct FakeEmbedder {
    dimensions: usize,
    max_chars: usize,
    table: HashMap<String, Embedding>,
    fallback: HashingEmbedder,
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
    drop_results: bool,
}

impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            max_chars: 1000,
            table: HashMap::new(),
            fallback: HashingEmbedder::new(dimensions, usize::MAX),
            calls: AtomicUsize::new(0),
            delay: None,
            fail: false,
            drop_results: false,
        }
    }

    pub fn with_vector(mut self, text: &str, v: Vec<f64>) -> Self {
        assert_eq!(v.len(), self.dimensions);
        self.table.insert(text.to_string(), v);
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Answers every call with no vectors at all.
    pub fn dropping_results(mut self) -> Self {
        self.drop_results = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn is_too_big(&self, text: &str) -> bool {
        text.chars().count() > self.max_chars
    }

    fn max_input_chars(&self) -> Option<usize> {
        Some(self.max_chars)
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Embedding>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DomainError::EmbeddingFailure("provider down".into()));
        }
        if inputs.iter().any(|t| self.is_too_big(t)) {
            return Err(DomainError::EmbeddingFailure("input too big".into()));
        }
        if self.drop_results {
            return Ok(vec![]);
        }
        let mut out = Vec::with_capacity(inputs.len());
        for text in inputs {
            match self.table.get(text) {
                Some(v) => out.push(v.clone()),
                None => out.push(self.fallback.embed_one(text).await?),
            }
        }
        Ok(out)
    }
}

/// The "demo" embedder: cat → x axis, dog → y axis, kitten leans towards cat.
pub fn demo_embedder() -> FakeEmbedder {
    FakeEmbedder::new(3)
        .with_vector("cat", vec![1.0, 0.0, 0.0])
        .with_vector("dog", vec![0.0, 1.0, 0.0])
        .with_vector("kitten", vec![0.9, 0.1, 0.0])
}

pub fn setup_with(embedder: Arc<FakeEmbedder>, settings: Settings) -> Embedbase {
    let store = Arc::new(InMemoryVectorStore::new(embedder.dimensions()));
    Embedbase::with_providers(embedder, store, settings).unwrap()
}

pub fn setup() -> Embedbase {
    setup_with(Arc::new(FakeEmbedder::new(16)), Settings::default())
}

pub fn meta(pairs: &[(&str, serde_json::Value)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
