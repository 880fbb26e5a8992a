use crate::domain::entities::stored_vector::Embedding;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::Embedder;
use std::time::Duration;

/// Calls the embedder with an optional deadline and checks it answered once per input.
pub(crate) async fn embed_texts(
    embedder: &dyn Embedder,
    texts: &[String],
    timeout: Option<Duration>,
) -> Result<Vec<Embedding>, DomainError> {
    let vectors = match timeout {
        Some(limit) => tokio::time::timeout(limit, embedder.embed(texts))
            .await
            .map_err(|_| DomainError::EmbeddingFailure(format!("embedding timed out after {limit:?}")))??,
        None => embedder.embed(texts).await?,
    };
    if vectors.len() != texts.len() {
        return Err(DomainError::EmbeddingFailure(format!(
            "embedder returned {} vectors for {} inputs",
            vectors.len(),
            texts.len()
        )));
    }
    Ok(vectors)
}
