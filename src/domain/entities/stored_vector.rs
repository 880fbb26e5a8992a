use crate::domain::entities::document::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Embedding = Vec<f64>;

/// What a dataset hands to a vector store: one embedded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub data: String,
    pub embedding: Embedding,
    pub metadata: Metadata,
}

impl VectorEntry {
    pub fn new(id: impl Into<String>, data: impl Into<String>, embedding: Embedding, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            embedding,
            metadata,
        }
    }
}

/// A vector as persisted by a store, scoped to its dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVector {
    pub id: String,
    pub dataset: String,
    pub data: String,
    pub embedding: Embedding,
    pub metadata: Metadata,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
}

impl StoredVector {
    pub fn from_entry(dataset: &str, entry: VectorEntry) -> Self {
        Self {
            dimension: entry.embedding.len(),
            id: entry.id,
            dataset: dataset.to_string(),
            data: entry.data,
            embedding: entry.embedding,
            metadata: entry.metadata,
            created_at: Utc::now(),
        }
    }

    /// Replaces content in place, keeping `created_at`.
    pub fn replace_with(&mut self, entry: VectorEntry) {
        self.dimension = entry.embedding.len();
        self.data = entry.data;
        self.embedding = entry.embedding;
        self.metadata = entry.metadata;
    }
}
