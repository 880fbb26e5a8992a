use serde::{Deserialize, Serialize};

/// Free-form JSON object attached to a document.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A document submitted to a dataset. `id` is generated when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub data: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            id: None,
            data: data.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
