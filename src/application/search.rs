use crate::application::embedding::embed_texts;
use crate::application::settings::Settings;
use crate::domain::entities::search_result::SearchResult;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::Embedder;
use crate::domain::ports::vector_store::VectorStore;
use std::sync::Arc;
use tracing::debug;

pub struct SearchUseCase {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    settings: Settings,
}

impl SearchUseCase {
    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<dyn VectorStore>, settings: Settings) -> Self {
        Self { embedder, vector_store, settings }
    }

    pub async fn semantic_search(
        &self,
        dataset: &str,
        query: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if self.embedder.is_too_big(query) {
            return Err(DomainError::DocumentTooLarge {
                length: query.chars().count(),
                limit: self.embedder.max_input_chars(),
            });
        }
        let top_k = top_k.unwrap_or(self.settings.default_top_k);
        let vectors = embed_texts(self.embedder.as_ref(), &[query.to_string()], self.settings.embed_timeout).await?;
        let Some(vector) = vectors.first() else {
            return Err(DomainError::EmbeddingFailure("no embedding returned for the query".into()));
        };
        let results = self.vector_store.query(dataset, vector, top_k)?;
        debug!(dataset, top_k, hits = results.len(), "semantic search");
        Ok(results)
    }
}
