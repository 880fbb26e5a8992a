use crate::domain::entities::stored_vector::Embedding;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::Embedder;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Token limit of the OpenAI embedding models.
const MAX_INPUT_TOKENS: usize = 8191;
/// Largest `input` array the embeddings endpoint accepts.
const MAX_BATCH_INPUTS: usize = 2048;

pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiEmbedding>,
}

#[derive(Deserialize)]
struct OpenAiEmbedding {
    index: usize,
    embedding: Vec<f64>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            client: Client::new(),
            api_key,
            dimensions: Self::model_dimension(&model),
            model,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Overrides the dimension inferred from the model name, for compatible
    /// servers running models this client does not know.
    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        if let Some(dimensions) = dimensions {
            self.dimensions = dimensions;
        }
        self
    }

    fn model_dimension(model: &str) -> usize {
        match model {
            "text-embedding-3-small" => 1536,
            "text-embedding-3-large" => 3072,
            "text-embedding-ada-002" => 1536,
            _ => 1536,
        }
    }

    /// Rough token count: about four bytes of English text per token.
    fn estimate_tokens(text: &str) -> usize {
        text.len().div_ceil(4)
    }

    async fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&OpenAiRequest {
                input: texts,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| DomainError::EmbeddingFailure(format!("OpenAI API error: {e}")))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(DomainError::EmbeddingFailure(format!(
                "OpenAI API rate limited, retry after {retry_after}s"
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::EmbeddingFailure(format!("OpenAI API {status}: {body}")));
        }

        let result: OpenAiResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::EmbeddingFailure(format!("Parse error: {e}")))?;
        if result.data.len() != texts.len() {
            return Err(DomainError::EmbeddingFailure(format!(
                "OpenAI API returned {} embeddings for {} inputs",
                result.data.len(),
                texts.len()
            )));
        }

        let mut data = result.data;
        data.sort_by_key(|d| d.index);
        if data.iter().enumerate().any(|(i, d)| d.index != i) {
            return Err(DomainError::EmbeddingFailure(
                "OpenAI API returned inconsistent embedding indices".into(),
            ));
        }
        if let Some(bad) = data.iter().find(|d| d.embedding.len() != self.dimensions) {
            return Err(DomainError::EmbeddingFailure(format!(
                "OpenAI API returned {} dimensions for model {}, expected {}",
                bad.embedding.len(),
                self.model,
                self.dimensions
            )));
        }
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait::async_trait]
impl Embedder for OpenAiEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn is_too_big(&self, text: &str) -> bool {
        Self::estimate_tokens(text) > MAX_INPUT_TOKENS
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Embedding>, DomainError> {
        if inputs.iter().any(|t| self.is_too_big(t)) {
            return Err(DomainError::EmbeddingFailure(format!(
                "input exceeds the {MAX_INPUT_TOKENS} token limit"
            )));
        }
        let mut vectors = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(MAX_BATCH_INPUTS) {
            debug!(inputs = chunk.len(), model = %self.model, "requesting embeddings");
            vectors.extend(self.embed_chunk(chunk).await?);
        }
        Ok(vectors)
    }
}
