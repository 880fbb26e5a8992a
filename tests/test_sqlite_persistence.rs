use embedbase::config::{Config, EmbeddingProviderKind, StoreKind};
use embedbase::domain::entities::document::{Document, Metadata};
use embedbase::domain::entities::stored_vector::VectorEntry;
use embedbase::domain::error::DomainError;
use embedbase::domain::ports::vector_store::VectorStore;
use embedbase::infrastructure::sqlite::vector_store::SqliteVectorStore;
use embedbase::Embedbase;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn db_path(dir: &TempDir) -> String {
    dir.path().join("vectors.db").to_string_lossy().into_owned()
}

fn sqlite_config(path: &str, dimensions: usize) -> Config {
    Config {
        store: StoreKind::Sqlite,
        db_path: path.to_string(),
        embedding_provider: EmbeddingProviderKind::Hashing,
        hashing_dimensions: dimensions,
        ..Config::default()
    }
}

#[test]
fn test_vectors_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let mut metadata = Metadata::new();
    metadata.insert("source".into(), json!("disk"));

    {
        let store = SqliteVectorStore::open(&path, 2).unwrap();
        store
            .insert("ds", VectorEntry::new("a", "alpha", vec![1.0, 0.0], metadata.clone()))
            .unwrap();
        store
            .insert("ds", VectorEntry::new("b", "beta", vec![0.0, 1.0], Metadata::new()))
            .unwrap();
    }

    let store = SqliteVectorStore::open(&path, 2).unwrap();
    assert_eq!(store.count("ds").unwrap(), 2);
    let results = store.query("ds", &[1.0, 0.0], 1).unwrap();
    assert_eq!(results[0].id, "a");
    assert_eq!(results[0].data, "alpha");
    assert_eq!(results[0].metadata, metadata);
}

#[test]
fn test_clear_is_persisted() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let store = SqliteVectorStore::open(&path, 2).unwrap();
        store
            .insert("gone", VectorEntry::new("a", "a", vec![1.0, 0.0], Metadata::new()))
            .unwrap();
        store
            .insert("kept", VectorEntry::new("a", "a", vec![1.0, 0.0], Metadata::new()))
            .unwrap();
        store.clear("gone").unwrap();
    }

    let store = SqliteVectorStore::open(&path, 2).unwrap();
    assert_eq!(store.count("gone").unwrap(), 0);
    assert_eq!(store.count("kept").unwrap(), 1);
}

#[tokio::test]
async fn test_composed_service_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let config = sqlite_config(&db_path(&dir), 64);

    {
        let eb = Embedbase::from_config(&config).unwrap();
        let ds = eb.dataset("notes").unwrap();
        let outcomes = ds
            .batch_add(vec![
                Document::new("sqlite keeps data on disk").with_id("n1"),
                Document::new("bananas are yellow").with_id("n2"),
            ])
            .await;
        assert!(outcomes.iter().all(|o| o.is_success()));
    }

    let eb = Embedbase::from_config(&config).unwrap();
    assert_eq!(eb.dimensions(), 64);
    let results = eb
        .dataset("notes")
        .unwrap()
        .search("data on disk", Some(1))
        .await
        .unwrap();
    assert_eq!(results[0].id, "n1");
}

#[test]
fn test_changing_embedder_dimensions_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    drop(Embedbase::from_config(&sqlite_config(&path, 32)).unwrap());

    let result = Embedbase::from_config(&sqlite_config(&path, 48));
    assert!(matches!(result, Err(DomainError::DimensionMismatch { .. })));
}

#[tokio::test]
async fn test_memory_store_from_config() {
    let config = Config {
        store: StoreKind::Memory,
        hashing_dimensions: 16,
        ..Config::default()
    };
    let eb = Embedbase::from_config(&config).unwrap();
    let ds = eb.dataset("ephemeral").unwrap();
    ds.add("in memory only", Metadata::new()).await.unwrap();
    assert_eq!(ds.count().unwrap(), 1);

    let fresh = Embedbase::from_config(&config).unwrap();
    assert_eq!(fresh.dataset("ephemeral").unwrap().count().unwrap(), 0);
}

#[test]
fn test_openai_without_key_is_a_config_error() {
    let config = Config {
        store: StoreKind::Memory,
        embedding_provider: EmbeddingProviderKind::OpenAi,
        ..Config::default()
    };
    assert!(matches!(Embedbase::from_config(&config), Err(DomainError::Config(_))));
}

#[test]
fn test_rejected_config_leaves_database_usable() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let result = Embedbase::from_config(&sqlite_config(&path, 0));
    assert!(matches!(result, Err(DomainError::InvalidInput(_))));

    let mut zero_top_k = sqlite_config(&path, 16);
    zero_top_k.settings.default_top_k = 0;
    assert!(matches!(Embedbase::from_config(&zero_top_k), Err(DomainError::InvalidInput(_))));

    let eb = Embedbase::from_config(&sqlite_config(&path, 384)).unwrap();
    assert_eq!(eb.dimensions(), 384);
}
