//! Data types for documents, chunks, vector records, and query matches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RagError, Result};

/// Free-form metadata attached to documents and vector records.
pub type Metadata = Map<String, Value>;

/// Metadata key holding the chunk's position within its document.
pub const CHUNK_INDEX_KEY: &str = "chunk_index";
/// Metadata key holding the document's position within its ingestion batch.
pub const DOC_INDEX_KEY: &str = "doc_index";
/// Metadata key holding the chunk text, recovered at query time.
pub const TEXT_KEY: &str = "text";

/// A source document: text plus optional metadata.
///
/// Metadata is expected to be a JSON object. `None` and JSON `null` are
/// both treated as an empty object; any other JSON value is rejected when
/// the document's chunks are turned into [`VectorRecord`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), metadata: None }
    }

    /// Attach object metadata to the document.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(Value::Object(metadata));
        self
    }

    /// Merge this document's metadata with the chunk-specific fields.
    ///
    /// Returns a fresh map; the document is left untouched. Chunk fields
    /// overwrite document keys of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidMetadata`] if the metadata is not a JSON object.
    pub fn merged_metadata(&self, chunk: &Chunk) -> Result<Metadata> {
        let mut merged = match &self.metadata {
            None | Some(Value::Null) => Metadata::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(RagError::InvalidMetadata {
                    doc_index: chunk.doc_index,
                    found: json_type_name(other),
                });
            }
        };
        merged.insert(CHUNK_INDEX_KEY.to_string(), Value::from(chunk.chunk_index));
        merged.insert(DOC_INDEX_KEY.to_string(), Value::from(chunk.doc_index));
        merged.insert(TEXT_KEY.to_string(), Value::String(chunk.text.clone()));
        Ok(merged)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A bounded passage of a [`Document`], the unit of embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the parent document in the ingestion batch.
    pub doc_index: usize,
    /// Position of this chunk within its document, starting at zero.
    pub chunk_index: usize,
    /// The chunk text.
    pub text: String,
}

impl Chunk {
    /// The deterministic vector id for this chunk.
    pub fn record_id(&self) -> String {
        record_id(self.doc_index, self.chunk_index)
    }
}

/// Build the vector id for a `(doc_index, chunk_index)` pair.
pub fn record_id(doc_index: usize, chunk_index: usize) -> String {
    format!("doc_{doc_index}_chunk_{chunk_index}")
}

/// An embedded chunk ready to be upserted into a vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Unique id, see [`record_id`].
    pub id: String,
    /// The embedding of the chunk text.
    pub embedding: Vec<f32>,
    /// Document metadata merged with `chunk_index`, `doc_index`, and `text`.
    pub metadata: Metadata,
}

/// A ranked result returned by a vector store query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryMatch {
    /// The id of the matched record.
    pub id: String,
    /// The similarity score (higher is more relevant).
    pub score: f32,
    /// The record's metadata, empty unless metadata was requested.
    #[serde(default)]
    pub metadata: Metadata,
}

impl QueryMatch {
    /// The chunk text stored in the match metadata, if any.
    pub fn text(&self) -> Option<&str> {
        self.metadata.get(TEXT_KEY).and_then(Value::as_str)
    }
}
