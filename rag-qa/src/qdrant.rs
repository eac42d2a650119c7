//! Qdrant vector store backend.
//!
//! Provides [`QdrantVectorStore`] which implements [`VectorStore`] using
//! the [qdrant-client](https://docs.rs/qdrant-client) crate over gRPC.
//!
//! Qdrant only accepts unsigned integers or UUIDs as point ids, so each
//! record id is mapped to a name-based UUID (v5) and the original id is kept
//! in the payload under [`RECORD_ID_KEY`]. The mapping is deterministic, so
//! upserting the same record id twice overwrites the same point.
//!
//! # Example
//!
//! ```rust,ignore
//! use rag_qa::qdrant::QdrantVectorStore;
//!
//! let store = QdrantVectorStore::new("http://localhost:6334")?;
//! store.ensure_index("docs", 1536, DistanceMetric::Cosine).await?;
//! ```

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::document::{Metadata, QueryMatch, VectorRecord};
use crate::error::{RagError, Result};
use crate::vectorstore::{DistanceMetric, VectorStore};

/// Payload key holding the original record id.
pub const RECORD_ID_KEY: &str = "record_id";

/// Default gRPC endpoint of a local Qdrant instance.
pub const DEFAULT_URL: &str = "http://localhost:6334";

/// A [`VectorStore`] backed by [Qdrant](https://qdrant.tech/).
///
/// Indexes map to Qdrant collections; record metadata is stored as payload.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Create a new Qdrant vector store connecting to the given URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Connect to `QDRANT_URL` (default `http://localhost:6334`), using
    /// `QDRANT_API_KEY` if it is set.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("QDRANT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let api_key = std::env::var("QDRANT_API_KEY").ok();
        let client = Qdrant::from_url(&url).api_key(api_key).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    /// Create a new Qdrant vector store from an existing client.
    pub fn from_client(client: Qdrant) -> Self {
        Self { client }
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStoreError { backend: "qdrant".to_string(), message: e.to_string() }
    }
}

/// Deterministic Qdrant point id for a record id.
pub fn point_id(record_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, record_id.as_bytes())
}

fn distance(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::DotProduct => Distance::Dot,
        DistanceMetric::Euclidean => Distance::Euclid,
    }
}

fn point_id_string(id: Option<&PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options.as_ref()) {
        Some(PointIdOptions::Uuid(s)) => s.clone(),
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

/// Convert a Qdrant payload value back into JSON.
fn json_from_qdrant_value(value: QdrantValue) -> Value {
    match value.kind {
        Some(Kind::NullValue(_)) | None => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::from(i),
        Some(Kind::DoubleValue(d)) => {
            serde_json::Number::from_f64(d).map(Value::Number).unwrap_or(Value::Null)
        }
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(json_from_qdrant_value).collect())
        }
        Some(Kind::StructValue(s)) => Value::Object(
            s.fields.into_iter().map(|(k, v)| (k, json_from_qdrant_value(v))).collect(),
        ),
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn ensure_index(
        &self,
        name: &str,
        dimensions: usize,
        metric: DistanceMetric,
    ) -> Result<()> {
        let collections = self.client.list_collections().await.map_err(Self::map_err)?;
        let exists = collections.collections.iter().any(|c| c.name == name);
        if exists {
            debug!(index = name, "qdrant collection already exists, skipping creation");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, distance(metric))),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(index = name, dimensions, ?metric, "created qdrant collection");
        Ok(())
    }

    async fn upsert(&self, index: &str, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let points = records
            .iter()
            .map(|record| {
                let mut payload = record.metadata.clone();
                payload.insert(RECORD_ID_KEY.to_string(), Value::String(record.id.clone()));
                let payload = Payload::try_from(Value::Object(payload)).map_err(Self::map_err)?;
                Ok(PointStruct::new(
                    point_id(&record.id).to_string(),
                    record.embedding.clone(),
                    payload,
                ))
            })
            .collect::<Result<Vec<PointStruct>>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(index, points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(index, count = records.len(), "upserted records to qdrant");
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        let response = self
            .client
            .search_points(
                // Payload is always fetched; the record id lives there.
                SearchPointsBuilder::new(index, vector.to_vec(), top_k as u64).with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let matches = response
            .result
            .into_iter()
            .map(|scored| {
                let mut metadata: Metadata = scored
                    .payload
                    .into_iter()
                    .map(|(k, v)| (k, json_from_qdrant_value(v)))
                    .collect();
                let id = match metadata.remove(RECORD_ID_KEY) {
                    Some(Value::String(id)) => id,
                    _ => point_id_string(scored.id.as_ref()),
                };
                if !include_metadata {
                    metadata.clear();
                }
                QueryMatch { id, score: scored.score, metadata }
            })
            .collect();

        Ok(matches)
    }
}
