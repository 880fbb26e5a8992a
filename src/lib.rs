pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

use crate::application::add_document::AddDocumentUseCase;
use crate::application::clear::ClearUseCase;
use crate::application::dataset::Dataset;
use crate::application::search::SearchUseCase;
use crate::application::settings::Settings;
use crate::config::{Config, EmbeddingProviderKind, StoreKind};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::Embedder;
use crate::domain::ports::vector_store::VectorStore;
use crate::infrastructure::embeddings::hashing::HashingEmbedder;
use crate::infrastructure::embeddings::openai::OpenAiEmbedder;
use crate::infrastructure::memory::vector_store::InMemoryVectorStore;
use crate::infrastructure::sqlite::vector_store::SqliteVectorStore;
use std::sync::Arc;
use tracing::info;

/// One composed service: an embedder and a vector store shared by every dataset.
pub struct Embedbase {
    dimensions: usize,
    settings: Settings,
    add_uc: Arc<AddDocumentUseCase>,
    search_uc: Arc<SearchUseCase>,
    clear_uc: Arc<ClearUseCase>,
}

impl Embedbase {
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let embedder: Arc<dyn Embedder> = match config.embedding_provider {
            EmbeddingProviderKind::OpenAi => {
                if config.api_key.is_empty() {
                    return Err(DomainError::Config(
                        "EMBEDBASE_EMBEDDING_API_KEY is required for the openai provider".into(),
                    ));
                }
                Arc::new(
                    OpenAiEmbedder::new(
                        config.api_key.clone(),
                        config.model.clone(),
                        Some(config.base_url_or_default().to_string()),
                    )
                    .with_dimensions(config.embedding_dimensions),
                )
            }
            EmbeddingProviderKind::Hashing => {
                Arc::new(HashingEmbedder::new(config.hashing_dimensions, config.max_input_chars))
            }
        };

        // Must run before a store is opened: SQLite pins the dimension on first open.
        let dimensions = embedder.dimensions();
        Self::check_composition(dimensions, &config.settings)?;
        let vector_store: Arc<dyn VectorStore> = match config.store {
            StoreKind::Sqlite => Arc::new(SqliteVectorStore::open(&config.db_path, dimensions)?),
            StoreKind::Memory => Arc::new(InMemoryVectorStore::new(dimensions)),
        };

        info!(
            provider = %config.embedding_provider,
            store = %config.store,
            dimensions,
            "composing embedbase"
        );
        Self::with_providers(embedder, vector_store, config.settings.clone())
    }

    /// Wires an embedder and a store together. Their dimensions must agree.
    pub fn with_providers(
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        settings: Settings,
    ) -> Result<Self, DomainError> {
        let dimensions = embedder.dimensions();
        Self::check_composition(dimensions, &settings)?;
        if vector_store.dimension() != dimensions {
            return Err(DomainError::DimensionMismatch {
                expected: vector_store.dimension(),
                actual: dimensions,
            });
        }

        Ok(Self {
            dimensions,
            add_uc: Arc::new(AddDocumentUseCase::new(
                embedder.clone(),
                vector_store.clone(),
                settings.clone(),
            )),
            search_uc: Arc::new(SearchUseCase::new(embedder, vector_store.clone(), settings.clone())),
            clear_uc: Arc::new(ClearUseCase::new(vector_store)),
            settings,
        })
    }

    fn check_composition(dimensions: usize, settings: &Settings) -> Result<(), DomainError> {
        if dimensions == 0 {
            return Err(DomainError::InvalidInput("embedder reports zero dimensions".into()));
        }
        if settings.default_top_k == 0 {
            return Err(DomainError::InvalidInput("default_top_k must be at least 1".into()));
        }
        Ok(())
    }

    /// Handle for the dataset called `name`. Datasets spring into existence on first insert.
    pub fn dataset(&self, name: &str) -> Result<Dataset, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("dataset name must not be empty".into()));
        }
        Ok(Dataset::new(
            name.to_string(),
            self.add_uc.clone(),
            self.search_uc.clone(),
            self.clear_uc.clone(),
        ))
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
