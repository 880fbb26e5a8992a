use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Document too large: {length} characters")]
    DocumentTooLarge { length: usize, limit: Option<usize> },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding failure: {0}")]
    EmbeddingFailure(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::DocumentTooLarge { .. } => ErrorKind::DocumentTooLarge,
            DomainError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            DomainError::EmbeddingFailure(_) => ErrorKind::EmbeddingFailure,
            DomainError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            DomainError::InvalidInput(_) => ErrorKind::InvalidInput,
            DomainError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Serializable tag for a [`DomainError`] variant, reported per item by batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DocumentTooLarge,
    DimensionMismatch,
    EmbeddingFailure,
    StoreUnavailable,
    InvalidInput,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::DocumentTooLarge => write!(f, "document_too_large"),
            ErrorKind::DimensionMismatch => write!(f, "dimension_mismatch"),
            ErrorKind::EmbeddingFailure => write!(f, "embedding_failure"),
            ErrorKind::StoreUnavailable => write!(f, "store_unavailable"),
            ErrorKind::InvalidInput => write!(f, "invalid_input"),
            ErrorKind::Config => write!(f, "config"),
        }
    }
}
