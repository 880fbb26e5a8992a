use crate::domain::entities::search_result::SearchResult;
use crate::domain::entities::stored_vector::{StoredVector, VectorEntry};
use crate::domain::error::DomainError;
use crate::domain::ports::vector_store::{validate_embedding, validate_entry, VectorStore};
use crate::domain::values::similarity::rank_top_k;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// One dataset's vectors in insertion order, with an id → slot index.
#[derive(Default)]
struct Partition {
    entries: Vec<StoredVector>,
    slots: HashMap<String, usize>,
}

impl Partition {
    fn upsert(&mut self, dataset: &str, entry: VectorEntry) {
        match self.slots.get(&entry.id) {
            Some(&slot) => self.entries[slot].replace_with(entry),
            None => {
                self.slots.insert(entry.id.clone(), self.entries.len());
                self.entries.push(StoredVector::from_entry(dataset, entry));
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }
}

/// Linear-scan reference store. Each dataset has its own lock, so writers to
/// one dataset never block readers or writers of another.
pub struct InMemoryVectorStore {
    dimension: usize,
    partitions: RwLock<HashMap<String, Arc<RwLock<Partition>>>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            partitions: RwLock::new(HashMap::new()),
        }
    }

    fn partition(&self, dataset: &str) -> Result<Option<Arc<RwLock<Partition>>>, DomainError> {
        let partitions = self.partitions.read().map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        Ok(partitions.get(dataset).cloned())
    }

    fn partition_or_create(&self, dataset: &str) -> Result<Arc<RwLock<Partition>>, DomainError> {
        if let Some(p) = self.partition(dataset)? {
            return Ok(p);
        }
        let mut partitions = self.partitions.write().map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        Ok(partitions.entry(dataset.to_string()).or_default().clone())
    }
}

impl VectorStore for InMemoryVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn insert(&self, dataset: &str, entry: VectorEntry) -> Result<(), DomainError> {
        validate_entry(&entry, self.dimension)?;
        let partition = self.partition_or_create(dataset)?;
        let mut partition = partition.write().map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
        partition.upsert(dataset, entry);
        Ok(())
    }

    fn batch_insert(&self, dataset: &str, entries: Vec<VectorEntry>) -> Vec<Result<(), DomainError>> {
        let checked: Vec<(VectorEntry, Result<(), DomainError>)> = entries
            .into_iter()
            .map(|e| {
                let r = validate_entry(&e, self.dimension);
                (e, r)
            })
            .collect();

        let partition = match self.partition_or_create(dataset) {
            Ok(p) => p,
            Err(e) => {
                let msg = e.to_string();
                return checked
                    .into_iter()
                    .map(|(_, r)| r.and(Err(DomainError::StoreUnavailable(msg.clone()))))
                    .collect();
            }
        };

        // Whole batch under one write guard so readers see all of it or none of it.
        let mut guard = match partition.write() {
            Ok(g) => g,
            Err(e) => {
                let msg = e.to_string();
                return checked
                    .into_iter()
                    .map(|(_, r)| r.and(Err(DomainError::StoreUnavailable(msg.clone()))))
                    .collect();
            }
        };

        let mut inserted = 0usize;
        let results = checked
            .into_iter()
            .map(|(entry, r)| {
                if r.is_ok() {
                    guard.upsert(dataset, entry);
                    inserted += 1;
                }
                r
            })
            .collect::<Vec<_>>();
        debug!(dataset, inserted, "batch insert applied");
        results
    }

    fn query(&self, dataset: &str, embedding: &[f64], top_k: usize) -> Result<Vec<SearchResult>, DomainError> {
        validate_embedding(embedding, self.dimension)?;
        let Some(partition) = self.partition(dataset)? else {
            return Ok(vec![]);
        };
        let partition = partition.read().map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;

        let ranked = rank_top_k(
            embedding,
            partition.entries.iter().map(|v| (v, v.embedding.as_slice())),
            top_k,
        );
        Ok(ranked
            .into_iter()
            .map(|(v, score)| SearchResult {
                id: v.id.clone(),
                data: v.data.clone(),
                metadata: v.metadata.clone(),
                score,
            })
            .collect())
    }

    fn clear(&self, dataset: &str) -> Result<(), DomainError> {
        if let Some(partition) = self.partition(dataset)? {
            let mut partition = partition.write().map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
            partition.clear();
        }
        Ok(())
    }

    fn count(&self, dataset: &str) -> Result<usize, DomainError> {
        match self.partition(dataset)? {
            Some(partition) => {
                let partition = partition.read().map_err(|e| DomainError::StoreUnavailable(e.to_string()))?;
                Ok(partition.entries.len())
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::document::Metadata;

    fn entry(id: &str, v: Vec<f64>) -> VectorEntry {
        VectorEntry::new(id, format!("text {id}"), v, Metadata::new())
    }

    #[test]
    fn test_upsert_keeps_slot_and_replaces_content() {
        let store = InMemoryVectorStore::new(2);
        store.insert("ds", entry("a", vec![1.0, 0.0])).unwrap();
        store.insert("ds", entry("b", vec![1.0, 0.0])).unwrap();
        let mut replacement = entry("a", vec![1.0, 0.0]);
        replacement.data = "updated".into();
        store.insert("ds", replacement).unwrap();

        assert_eq!(store.count("ds").unwrap(), 2);
        let results = store.query("ds", &[1.0, 0.0], 10).unwrap();
        assert_eq!(results[0].id, "a");
        assert_eq!(results[0].data, "updated");
        assert_eq!(results[1].id, "b");
    }

    #[test]
    fn test_rejects_non_finite() {
        let store = InMemoryVectorStore::new(2);
        let err = store.insert("ds", entry("a", vec![f64::NAN, 0.0])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(store.count("ds").unwrap(), 0);
    }

    #[test]
    fn test_query_dimension_checked() {
        let store = InMemoryVectorStore::new(3);
        let err = store.query("ds", &[1.0, 0.0], 5).unwrap_err();
        assert!(matches!(err, DomainError::DimensionMismatch { expected: 3, actual: 2 }));
    }
}
