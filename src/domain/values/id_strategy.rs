use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// How a dataset names documents added without an explicit id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// UUID v4 per document.
    #[default]
    Random,
    /// Hex SHA-256 of the document text; re-adding the same text upserts.
    ContentHash,
}

impl IdStrategy {
    pub fn generate(&self, data: &str) -> String {
        match self {
            IdStrategy::Random => uuid::Uuid::new_v4().to_string(),
            IdStrategy::ContentHash => {
                let digest = Sha256::digest(data.as_bytes());
                digest.iter().map(|b| format!("{b:02x}")).collect()
            }
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Random => write!(f, "random"),
            IdStrategy::ContentHash => write!(f, "content-hash"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" | "uuid" => Ok(IdStrategy::Random),
            "content-hash" | "content_hash" | "hash" => Ok(IdStrategy::ContentHash),
            _ => Err(format!("Unknown id strategy: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_unique() {
        let a = IdStrategy::Random.generate("same text");
        let b = IdStrategy::Random.generate("same text");
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = IdStrategy::ContentHash.generate("hello");
        let b = IdStrategy::ContentHash.generate("hello");
        assert_eq!(a, b);
        assert_eq!(
            a,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_ne!(a, IdStrategy::ContentHash.generate("hello!"));
    }

    #[test]
    fn test_parse() {
        assert_eq!("random".parse::<IdStrategy>().unwrap(), IdStrategy::Random);
        assert_eq!(
            "Content-Hash".parse::<IdStrategy>().unwrap(),
            IdStrategy::ContentHash
        );
        assert!("sequential".parse::<IdStrategy>().is_err());
    }
}
