use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::VectorStore;
use std::sync::Arc;
use tracing::info;

pub struct ClearUseCase {
    vector_store: Arc<dyn VectorStore>,
}

impl ClearUseCase {
    pub fn new(vector_store: Arc<dyn VectorStore>) -> Self {
        Self { vector_store }
    }

    pub fn clear(&self, dataset: &str) -> Result<(), DomainError> {
        self.vector_store.clear(dataset)?;
        info!(dataset, "dataset cleared");
        Ok(())
    }

    pub fn count(&self, dataset: &str) -> Result<usize, DomainError> {
        self.vector_store.count(dataset)
    }
}
