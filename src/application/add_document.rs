use crate::application::embedding::embed_texts;
use crate::application::settings::Settings;
use crate::domain::entities::add_outcome::AddOutcome;
use crate::domain::entities::document::Document;
use crate::domain::entities::stored_vector::VectorEntry;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::Embedder;
use crate::domain::ports::vector_store::VectorStore;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AddDocumentUseCase {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    settings: Settings,
}

impl AddDocumentUseCase {
    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<dyn VectorStore>, settings: Settings) -> Self {
        Self {
            embedder,
            vector_store,
            settings,
        }
    }

    fn resolve_id(&self, document: &Document) -> String {
        match &document.id {
            Some(id) => id.clone(),
            None => self.settings.id_strategy.generate(&document.data),
        }
    }

    fn check(&self, id: &str, data: &str) -> Result<(), DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidInput("id must not be empty".into()));
        }
        if self.embedder.is_too_big(data) {
            return Err(DomainError::DocumentTooLarge {
                length: data.chars().count(),
                limit: self.embedder.max_input_chars(),
            });
        }
        Ok(())
    }

    pub async fn execute(&self, dataset: &str, document: Document) -> Result<AddOutcome, DomainError> {
        let id = self.resolve_id(&document);
        self.check(&id, &document.data)?;

        let texts = [document.data];
        let mut vectors = embed_texts(self.embedder.as_ref(), &texts, self.settings.embed_timeout).await?;
        let [data] = texts;
        let embedding = vectors.pop().unwrap_or_default();

        self.vector_store
            .insert(dataset, VectorEntry::new(id.clone(), data, embedding, document.metadata))?;
        debug!(dataset, id = %id, "document added");
        Ok(AddOutcome::success(id))
    }

    /// Adds documents independently. All embeddable texts go to the embedder in
    /// a single call; the output has one outcome per input, in input order.
    pub async fn execute_batch(&self, dataset: &str, documents: Vec<Document>) -> Vec<AddOutcome> {
        let ids: Vec<String> = documents.iter().map(|d| self.resolve_id(d)).collect();
        let mut outcomes: Vec<Option<AddOutcome>> = vec![None; documents.len()];
        let mut pending: Vec<(usize, Document)> = Vec::with_capacity(documents.len());

        for (i, document) in documents.into_iter().enumerate() {
            match self.check(&ids[i], &document.data) {
                Ok(()) => pending.push((i, document)),
                Err(e) => outcomes[i] = Some(AddOutcome::failure(ids[i].clone(), &e)),
            }
        }

        if !pending.is_empty() {
            let texts: Vec<String> = pending.iter().map(|(_, d)| d.data.clone()).collect();
            match embed_texts(self.embedder.as_ref(), &texts, self.settings.embed_timeout).await {
                Ok(vectors) => {
                    let slots: Vec<usize> = pending.iter().map(|(i, _)| *i).collect();
                    let entries: Vec<VectorEntry> = pending
                        .into_iter()
                        .zip(vectors)
                        .map(|((i, doc), embedding)| VectorEntry::new(ids[i].clone(), doc.data, embedding, doc.metadata))
                        .collect();
                    let results = self.vector_store.batch_insert(dataset, entries);
                    for (i, result) in slots.into_iter().zip(results) {
                        outcomes[i] = Some(match result {
                            Ok(()) => AddOutcome::success(ids[i].clone()),
                            Err(e) => AddOutcome::failure(ids[i].clone(), &e),
                        });
                    }
                }
                Err(e) => {
                    warn!(dataset, count = pending.len(), error = %e, "batch embedding failed");
                    for (i, _) in pending {
                        outcomes[i] = Some(AddOutcome::failure(ids[i].clone(), &e));
                    }
                }
            }
        }

        let outcomes: Vec<AddOutcome> = outcomes
            .into_iter()
            .zip(ids)
            .map(|(o, id)| {
                o.unwrap_or_else(|| {
                    AddOutcome::failure(
                        id,
                        &DomainError::StoreUnavailable("store returned no result for entry".into()),
                    )
                })
            })
            .collect();
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        debug!(dataset, total = outcomes.len(), failed, "batch add finished");
        outcomes
    }
}
