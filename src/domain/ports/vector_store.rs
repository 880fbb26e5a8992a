use crate::domain::entities::search_result::SearchResult;
use crate::domain::entities::stored_vector::VectorEntry;
use crate::domain::error::DomainError;

/// Dataset-scoped vector storage.
///
/// Re-inserting an existing id within a dataset is an upsert: data, embedding
/// and metadata are replaced and the entry keeps its original insertion slot,
/// which is what breaks score ties in [`VectorStore::query`].
pub trait VectorStore: Send + Sync {
    /// Length every stored vector must have.
    fn dimension(&self) -> usize;

    fn insert(&self, dataset: &str, entry: VectorEntry) -> Result<(), DomainError>;

    /// Inserts each entry independently; one result per entry, in input order.
    fn batch_insert(&self, dataset: &str, entries: Vec<VectorEntry>) -> Vec<Result<(), DomainError>>;

    /// Top `top_k` entries by cosine similarity, best first. Unknown datasets yield nothing.
    fn query(&self, dataset: &str, embedding: &[f64], top_k: usize) -> Result<Vec<SearchResult>, DomainError>;

    /// Removes every vector in `dataset`. A no-op for unknown datasets.
    fn clear(&self, dataset: &str) -> Result<(), DomainError>;

    fn count(&self, dataset: &str) -> Result<usize, DomainError>;
}

/// Checks an entry against the store contract before anything is written.
pub fn validate_entry(entry: &VectorEntry, dimension: usize) -> Result<(), DomainError> {
    if entry.id.is_empty() {
        return Err(DomainError::InvalidInput("id must not be empty".into()));
    }
    validate_embedding(&entry.embedding, dimension)
}

pub fn validate_embedding(embedding: &[f64], dimension: usize) -> Result<(), DomainError> {
    if embedding.len() != dimension {
        return Err(DomainError::DimensionMismatch {
            expected: dimension,
            actual: embedding.len(),
        });
    }
    if embedding.iter().any(|x| !x.is_finite()) {
        return Err(DomainError::InvalidInput(
            "embedding contains non-finite values".into(),
        ));
    }
    Ok(())
}
