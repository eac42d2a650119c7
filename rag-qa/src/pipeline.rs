//! RAG pipeline facade.
//!
//! The [`RagPipeline`] holds the collaborator handles for the lifetime of
//! the application and exposes the two public operations: [`ingest`] and
//! [`answer`]. Internally it composes an [`IngestionPipeline`] and a
//! [`QueryEngine`] that share the same embedding provider and vector store.
//!
//! [`ingest`]: RagPipeline::ingest
//! [`answer`]: RagPipeline::answer
//!
//! # Example
//!
//! ```rust,ignore
//! use rag_qa::{Document, InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .generator(Arc::new(my_generator))
//!     .open()
//!     .await?;
//!
//! pipeline.ingest(&[Document::new("TechCorp was founded in 2010.")]).await?;
//! let answer = pipeline.answer("When was TechCorp founded?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::{Chunker, WordChunker};
use crate::config::RagConfig;
use crate::document::{Document, QueryMatch};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::ingest::{IngestReport, IngestionPipeline};
use crate::query::QueryEngine;
use crate::vectorstore::VectorStore;

/// The RAG pipeline: ingestion plus grounded question answering.
///
/// Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    ingestion: IngestionPipeline,
    query_engine: QueryEngine,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Return the ingestion half of the pipeline.
    pub fn ingestion(&self) -> &IngestionPipeline {
        &self.ingestion
    }

    /// Return the query half of the pipeline.
    pub fn query_engine(&self) -> &QueryEngine {
        &self.query_engine
    }

    /// Create the configured index if it does not exist yet.
    ///
    /// The index is created with the dimensionality reported by the
    /// [`EmbeddingProvider`] and the configured metric.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the vector store operation fails.
    pub async fn ensure_index(&self) -> Result<()> {
        let name = &self.config.index_name;
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.ensure_index(name, dimensions, self.config.metric).await.map_err(|e| {
            error!(index = %name, error = %e, "failed to ensure index");
            RagError::PipelineError(format!("failed to ensure index '{name}': {e}"))
        })?;
        info!(index = %name, dimensions, metric = ?self.config.metric, "index ready");
        Ok(())
    }

    /// Chunk, embed, and upsert `documents` in batches.
    ///
    /// See [`IngestionPipeline::ingest`].
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        self.ingestion.ingest(documents).await
    }

    /// Answer `question` using the configured `top_k`.
    ///
    /// See [`QueryEngine::answer`].
    pub async fn answer(&self, question: &str) -> Result<String> {
        self.query_engine.answer(question, self.config.top_k).await
    }

    /// Answer `question` from the `top_k` nearest passages.
    pub async fn answer_with_top_k(&self, question: &str, top_k: usize) -> Result<String> {
        self.query_engine.answer(question, top_k).await
    }

    /// Retrieve the `top_k` nearest passages without generating an answer.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<QueryMatch>> {
        self.query_engine.retrieve(question, top_k).await
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The embedding provider, vector store, and generator are required. The
/// config defaults to [`RagConfig::default`] and the chunker to a
/// [`WordChunker`] sized by `config.chunk_size`.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::builder().top_k(5).build()?)
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .generator(Arc::new(generator))
///     .chunker(Arc::new(chunker))  // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    generator: Option<Arc<dyn Generator>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the answer generator.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replace the default [`WordChunker`].
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating the config and required fields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing or
    /// the config is invalid.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| RagError::ConfigError("generator is required".to_string()))?;
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(WordChunker::new(config.chunk_size)),
        };

        let ingestion = IngestionPipeline::new(
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store),
            chunker,
            config.index_name.clone(),
            config.batch_size,
        );
        let query_engine = QueryEngine::new(
            Arc::clone(&embedding_provider),
            Arc::clone(&vector_store),
            generator,
            config.index_name.clone(),
            config.temperature,
        );

        Ok(RagPipeline { config, embedding_provider, vector_store, ingestion, query_engine })
    }

    /// Build the pipeline and ensure its index exists.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`build`](Self::build) and
    /// [`RagPipeline::ensure_index`].
    pub async fn open(self) -> Result<RagPipeline> {
        let pipeline = self.build()?;
        pipeline.ensure_index().await?;
        Ok(pipeline)
    }
}
