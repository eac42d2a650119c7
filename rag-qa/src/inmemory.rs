//! In-memory vector store.
//!
//! [`InMemoryVectorStore`] keeps every index in a map guarded by a
//! `tokio::sync::RwLock`. It is suitable for development, testing, and
//! small corpora; nothing survives the process.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Metadata, QueryMatch, VectorRecord};
use crate::error::{RagError, Result};
use crate::vectorstore::{DistanceMetric, VectorStore};

const BACKEND: &str = "InMemory";

#[derive(Debug)]
struct Index {
    dimensions: usize,
    metric: DistanceMetric,
    // Ordered by id so equal scores rank deterministically.
    records: BTreeMap<String, VectorRecord>,
}

/// An in-memory vector store with exhaustive similarity search.
///
/// # Example
///
/// ```rust,ignore
/// use rag_qa::{DistanceMetric, InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_index("docs", 384, DistanceMetric::Cosine).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    indexes: RwLock<HashMap<String, Index>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored in `index`, or `None` if it does not exist.
    pub async fn record_count(&self, index: &str) -> Option<usize> {
        self.indexes.read().await.get(index).map(|i| i.records.len())
    }

    /// Fetch a stored record by id.
    pub async fn get(&self, index: &str, id: &str) -> Option<VectorRecord> {
        self.indexes.read().await.get(index).and_then(|i| i.records.get(id).cloned())
    }
}

fn missing_index(name: &str) -> RagError {
    RagError::VectorStoreError {
        backend: BACKEND.to_string(),
        message: format!("index '{name}' does not exist"),
    }
}

fn dimension_mismatch(index: &str, expected: usize, got: usize) -> RagError {
    RagError::VectorStoreError {
        backend: BACKEND.to_string(),
        message: format!("index '{index}' expects {expected} dimensions, got {got}"),
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot = dot_product(a, b);
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

fn score(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::Cosine => cosine_similarity(a, b),
        DistanceMetric::DotProduct => dot_product(a, b),
        DistanceMetric::Euclidean => -euclidean_distance(a, b),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_index(
        &self,
        name: &str,
        dimensions: usize,
        metric: DistanceMetric,
    ) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        if let Some(existing) = indexes.get(name) {
            if existing.dimensions != dimensions || existing.metric != metric {
                return Err(RagError::VectorStoreError {
                    backend: BACKEND.to_string(),
                    message: format!(
                        "index '{name}' already exists with {} dimensions ({:?})",
                        existing.dimensions, existing.metric
                    ),
                });
            }
            debug!(index = name, "index already exists, skipping creation");
            return Ok(());
        }
        indexes.insert(name.to_string(), Index { dimensions, metric, records: BTreeMap::new() });
        debug!(index = name, dimensions, ?metric, "created in-memory index");
        Ok(())
    }

    async fn upsert(&self, index: &str, records: &[VectorRecord]) -> Result<()> {
        let mut indexes = self.indexes.write().await;
        let store = indexes.get_mut(index).ok_or_else(|| missing_index(index))?;
        if let Some(bad) = records.iter().find(|r| r.embedding.len() != store.dimensions) {
            return Err(dimension_mismatch(index, store.dimensions, bad.embedding.len()));
        }
        for record in records {
            store.records.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        let indexes = self.indexes.read().await;
        let store = indexes.get(index).ok_or_else(|| missing_index(index))?;
        if vector.len() != store.dimensions {
            return Err(dimension_mismatch(index, store.dimensions, vector.len()));
        }

        let mut scored: Vec<(f32, &VectorRecord)> = store
            .records
            .values()
            .map(|record| (score(store.metric, &record.embedding, vector), record))
            .collect();

        // Stable sort keeps id order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, record)| QueryMatch {
                id: record.id.clone(),
                score,
                metadata: if include_metadata { record.metadata.clone() } else { Metadata::new() },
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_orthogonal_and_parallel_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[2.0, 0.0], &[5.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn euclidean_scores_rank_closer_higher() {
        let near = score(DistanceMetric::Euclidean, &[1.0, 1.0], &[1.0, 1.5]);
        let far = score(DistanceMetric::Euclidean, &[1.0, 1.0], &[4.0, 5.0]);
        assert!(near > far);
        assert!((far + 5.0).abs() < 1e-6);
    }
}
