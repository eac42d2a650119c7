//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::{QueryMatch, VectorRecord};
use crate::error::Result;

/// Similarity metric an index is created with.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine of the angle between vectors.
    #[default]
    Cosine,
    /// Raw dot product.
    DotProduct,
    /// Euclidean distance; scores are reported so that higher is closer.
    Euclidean,
}

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named indexes of [`VectorRecord`]s keyed by id.
/// Upserting an existing id overwrites the stored record.
///
/// # Example
///
/// ```rust,ignore
/// use rag_qa::{DistanceMetric, InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.ensure_index("docs", 1536, DistanceMetric::Cosine).await?;
/// store.upsert("docs", &records).await?;
/// let matches = store.query("docs", &query_embedding, 3, true).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named index. No-op if it already exists.
    async fn ensure_index(&self, name: &str, dimensions: usize, metric: DistanceMetric)
    -> Result<()>;

    /// Insert or overwrite records in an index.
    async fn upsert(&self, index: &str, records: &[VectorRecord]) -> Result<()>;

    /// Return the `top_k` records nearest to `vector`.
    ///
    /// Results are ordered by descending score. When `include_metadata` is
    /// false the returned matches carry empty metadata.
    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>>;
}
