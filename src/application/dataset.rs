use crate::application::add_document::AddDocumentUseCase;
use crate::application::clear::ClearUseCase;
use crate::application::search::SearchUseCase;
use crate::domain::entities::add_outcome::AddOutcome;
use crate::domain::entities::document::{Document, Metadata};
use crate::domain::entities::search_result::SearchResult;
use crate::domain::error::DomainError;
use std::sync::Arc;
use tracing::instrument;

/// A named partition of the service's vector store.
///
/// Handles are cheap to clone and hold no documents themselves; two handles
/// with the same name address the same vectors.
#[derive(Clone)]
pub struct Dataset {
    name: String,
    add_uc: Arc<AddDocumentUseCase>,
    search_uc: Arc<SearchUseCase>,
    clear_uc: Arc<ClearUseCase>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Dataset {
    pub(crate) fn new(
        name: String,
        add_uc: Arc<AddDocumentUseCase>,
        search_uc: Arc<SearchUseCase>,
        clear_uc: Arc<ClearUseCase>,
    ) -> Self {
        Self {
            name,
            add_uc,
            search_uc,
            clear_uc,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Embeds and stores one document under a generated id.
    pub async fn add(&self, data: impl Into<String>, metadata: Metadata) -> Result<AddOutcome, DomainError> {
        self.add_document(Document::new(data).with_metadata(metadata)).await
    }

    #[instrument(skip_all, fields(dataset = %self.name))]
    pub async fn add_document(&self, document: Document) -> Result<AddOutcome, DomainError> {
        self.add_uc.execute(&self.name, document).await
    }

    /// Adds every document, isolating failures per item.
    #[instrument(skip_all, fields(dataset = %self.name, count = documents.len()))]
    pub async fn batch_add(&self, documents: Vec<Document>) -> Vec<AddOutcome> {
        if documents.is_empty() {
            return vec![];
        }
        self.add_uc.execute_batch(&self.name, documents).await
    }

    /// Ranks the dataset against `query`; `None` uses the service's default `top_k`.
    #[instrument(skip_all, fields(dataset = %self.name, top_k = ?top_k))]
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchResult>, DomainError> {
        self.search_uc.semantic_search(&self.name, query, top_k).await
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        self.clear_uc.clear(&self.name)
    }

    pub fn count(&self) -> Result<usize, DomainError> {
        self.clear_uc.count(&self.name)
    }
}
