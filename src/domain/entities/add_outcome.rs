use crate::domain::error::{DomainError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddStatus {
    Success,
    Error,
}

impl fmt::Display for AddStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddStatus::Success => write!(f, "success"),
            AddStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&DomainError> for AddError {
    fn from(e: &DomainError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Per-document result of an add: the `{id, status}` pair callers see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOutcome {
    pub id: String,
    pub status: AddStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AddError>,
}

impl AddOutcome {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: AddStatus::Success,
            error: None,
        }
    }

    pub fn failure(id: impl Into<String>, error: &DomainError) -> Self {
        Self {
            id: id.into(),
            status: AddStatus::Error,
            error: Some(AddError::from(error)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AddStatus::Success
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
