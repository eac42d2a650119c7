//! Batched document ingestion.
//!
//! [`IngestionPipeline`] walks documents in order, chunks each one, embeds
//! every chunk, and buffers the resulting [`VectorRecord`]s. The buffer is
//! flushed to the vector store whenever it reaches the batch size and once
//! more at the end, so no single upsert carries more than `batch_size`
//! records.
//!
//! Failures abort the call. Batches flushed before the failure stay in the
//! store; records still buffered are dropped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::chunking::Chunker;
use crate::document::{Document, VectorRecord};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Summary of one [`IngestionPipeline::ingest`] call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of documents processed.
    pub documents: usize,
    /// Number of records upserted.
    pub records: usize,
    /// Number of upsert calls made.
    pub batches: usize,
}

/// Turns documents into embedded records and writes them in batches.
pub struct IngestionPipeline {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    index_name: String,
    batch_size: usize,
}

impl IngestionPipeline {
    /// Create an ingestion pipeline writing to `index_name`.
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        chunker: Arc<dyn Chunker>,
        index_name: impl Into<String>,
        batch_size: usize,
    ) -> Self {
        Self {
            embedding_provider,
            vector_store,
            chunker,
            index_name: index_name.into(),
            batch_size: batch_size.max(1),
        }
    }

    /// The index records are written to.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Maximum number of records per upsert call.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Ingest documents: chunk → embed → buffer → upsert.
    ///
    /// Each document's position in `documents` is its `doc_index`. Chunks
    /// are embedded one at a time in document-then-chunk order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidMetadata`] if a document's metadata is not
    /// an object, or [`RagError::PipelineError`] if embedding or an upsert
    /// fails. Nothing already flushed is rolled back.
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut buffer: Vec<VectorRecord> = Vec::with_capacity(self.batch_size);

        for (doc_index, document) in documents.iter().enumerate() {
            let chunks = self.chunker.chunk(doc_index, document);
            let chunk_count = chunks.len();

            for chunk in chunks {
                let id = chunk.record_id();
                let metadata = document.merged_metadata(&chunk)?;
                let embedding = self.embedding_provider.embed(&chunk.text).await.map_err(|e| {
                    error!(record.id = %id, error = %e, "embedding failed during ingestion");
                    RagError::PipelineError(format!("embedding failed for chunk '{id}': {e}"))
                })?;

                buffer.push(VectorRecord { id, embedding, metadata });
                if buffer.len() >= self.batch_size {
                    self.flush(&mut buffer, &mut report).await?;
                }
            }

            report.documents += 1;
            debug!(doc_index, chunk_count, "chunked and embedded document");
        }

        if !buffer.is_empty() {
            self.flush(&mut buffer, &mut report).await?;
        }

        info!(
            index = %self.index_name,
            documents = report.documents,
            records = report.records,
            batches = report.batches,
            "ingestion completed"
        );

        Ok(report)
    }

    async fn flush(&self, buffer: &mut Vec<VectorRecord>, report: &mut IngestReport) -> Result<()> {
        let batch = std::mem::take(buffer);
        self.vector_store.upsert(&self.index_name, &batch).await.map_err(|e| {
            error!(index = %self.index_name, batch_size = batch.len(), error = %e, "upsert failed");
            RagError::PipelineError(format!(
                "upsert of {} records into '{}' failed: {e}",
                batch.len(),
                self.index_name
            ))
        })?;

        report.records += batch.len();
        report.batches += 1;
        debug!(index = %self.index_name, batch_size = batch.len(), "flushed batch");
        Ok(())
    }
}
