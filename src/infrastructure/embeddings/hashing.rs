use crate::domain::entities::stored_vector::Embedding;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::Embedder;
use crate::domain::values::similarity::l2_normalize;
use sha2::{Digest, Sha256};

pub const DEFAULT_DIMENSIONS: usize = 384;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 1000;

/// Local, dependency-free embedder using signed feature hashing over word tokens.
///
/// Texts sharing words land near each other; there is no semantics beyond that.
/// Output is deterministic across runs and platforms.
pub struct HashingEmbedder {
    dimensions: usize,
    max_input_chars: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize, max_input_chars: usize) -> Self {
        Self {
            dimensions,
            max_input_chars,
        }
    }

    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn embed_text(&self, text: &str) -> Embedding {
        let mut v = vec![0.0_f64; self.dimensions];
        if self.dimensions == 0 {
            return v;
        }
        for token in Self::tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            let index = (u64::from_le_bytes(bucket) % self.dimensions as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[index] += sign;
        }
        l2_normalize(&mut v);
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS, DEFAULT_MAX_INPUT_CHARS)
    }
}

#[async_trait::async_trait]
impl Embedder for HashingEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn is_too_big(&self, text: &str) -> bool {
        text.chars().count() > self.max_input_chars
    }

    fn max_input_chars(&self) -> Option<usize> {
        Some(self.max_input_chars)
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Embedding>, DomainError> {
        if let Some(big) = inputs.iter().find(|t| self.is_too_big(t)) {
            return Err(DomainError::EmbeddingFailure(format!(
                "input of {} characters exceeds the {} character limit",
                big.chars().count(),
                self.max_input_chars
            )));
        }
        Ok(inputs.iter().map(|t| self.embed_text(t)).collect())
    }
}
