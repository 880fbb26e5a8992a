use crate::domain::entities::stored_vector::Embedding;
use crate::domain::error::DomainError;

/// Turns text into fixed-dimension vectors.
///
/// Implementations classify oversized input through [`Embedder::is_too_big`]
/// but never chunk it; callers filter before calling [`Embedder::embed`].
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder produces. Constant per instance.
    fn dimensions(&self) -> usize;

    fn is_too_big(&self, text: &str) -> bool;

    /// Largest accepted input in characters, when the limit is a plain character count.
    fn max_input_chars(&self) -> Option<usize> {
        None
    }

    /// Embeds `inputs`, returning one vector per input in the same order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Embedding>, DomainError>;

    async fn embed_one(&self, text: &str) -> Result<Embedding, DomainError> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        match (vectors.pop(), vectors.is_empty()) {
            (Some(v), true) => Ok(v),
            _ => Err(DomainError::EmbeddingFailure(
                "expected exactly one embedding for one input".into(),
            )),
        }
    }
}
