//! Environment-driven configuration for composing an [`crate::Embedbase`].
//!
//! Every knob has a default, so an empty environment yields a working local
//! setup: hashing embedder over a SQLite file in the current directory.

use crate::application::settings::{Settings, DEFAULT_TOP_K};
use crate::domain::error::DomainError;
use crate::domain::values::id_strategy::IdStrategy;
use crate::infrastructure::embeddings::{hashing, openai};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "./embedbase.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    Hashing,
    OpenAi,
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hashing" | "local" => Ok(EmbeddingProviderKind::Hashing),
            "openai" => Ok(EmbeddingProviderKind::OpenAi),
            _ => Err(format!("Unknown embedding provider: {s}")),
        }
    }
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProviderKind::Hashing => write!(f, "hashing"),
            EmbeddingProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            _ => Err(format!("Unknown vector store: {s}")),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Sqlite => write!(f, "sqlite"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store: StoreKind,
    pub db_path: String,
    pub embedding_provider: EmbeddingProviderKind,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Vector size of the remote model; inferred from the model name when unset.
    pub embedding_dimensions: Option<usize>,
    pub hashing_dimensions: usize,
    pub max_input_chars: usize,
    pub log_format: LogFormat,
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::Sqlite,
            db_path: DEFAULT_DB_PATH.to_string(),
            embedding_provider: EmbeddingProviderKind::Hashing,
            api_key: String::new(),
            model: None,
            base_url: None,
            embedding_dimensions: None,
            hashing_dimensions: hashing::DEFAULT_DIMENSIONS,
            max_input_chars: hashing::DEFAULT_MAX_INPUT_CHARS,
            log_format: LogFormat::Pretty,
            settings: Settings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let default_top_k = parse_or(&get, "EMBEDBASE_DEFAULT_TOP_K", DEFAULT_TOP_K)?;
        if default_top_k == 0 {
            return Err(DomainError::Config("EMBEDBASE_DEFAULT_TOP_K must be at least 1".into()));
        }
        let embed_timeout = get("EMBEDBASE_EMBED_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<f64>()
                    .ok()
                    .filter(|secs| secs.is_finite() && *secs > 0.0)
                    .map(Duration::from_secs_f64)
                    .ok_or_else(|| {
                        DomainError::Config(format!("EMBEDBASE_EMBED_TIMEOUT_SECS must be a positive number, got '{v}'"))
                    })
            })
            .transpose()?;

        Ok(Self {
            store: parse_or(&get, "EMBEDBASE_STORE", defaults.store)?,
            db_path: get("EMBEDBASE_DB").unwrap_or(defaults.db_path),
            embedding_provider: parse_or(&get, "EMBEDBASE_EMBEDDING_PROVIDER", defaults.embedding_provider)?,
            api_key: get("EMBEDBASE_EMBEDDING_API_KEY").unwrap_or_default(),
            model: get("EMBEDBASE_EMBEDDING_MODEL"),
            base_url: get("EMBEDBASE_EMBEDDING_BASE_URL"),
            embedding_dimensions: get("EMBEDBASE_EMBEDDING_DIMENSIONS")
                .map(|v| {
                    v.parse::<usize>()
                        .map_err(|e| DomainError::Config(format!("EMBEDBASE_EMBEDDING_DIMENSIONS: {e}")))
                })
                .transpose()?,
            hashing_dimensions: parse_or(&get, "EMBEDBASE_HASHING_DIMENSIONS", defaults.hashing_dimensions)?,
            max_input_chars: parse_or(&get, "EMBEDBASE_MAX_INPUT_CHARS", defaults.max_input_chars)?,
            log_format: parse_or(&get, "EMBEDBASE_LOG_FORMAT", defaults.log_format)?,
            settings: Settings {
                default_top_k,
                id_strategy: parse_or(&get, "EMBEDBASE_ID_STRATEGY", IdStrategy::default())?,
                embed_timeout,
            },
        })
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL)
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T, DomainError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| DomainError::Config(format!("{key}: {e}"))),
    }
}
