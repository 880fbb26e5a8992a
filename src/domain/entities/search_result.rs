use crate::domain::entities::document::Metadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub data: String,
    pub metadata: Metadata,
    /// Cosine similarity to the query, higher is closer.
    pub score: f64,
}
