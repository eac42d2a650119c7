//! Error types for the `rag-qa` crate.

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
///
/// Collaborator failures are never retried or classified further; they
/// surface through one of these variants and abort the current call.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while generating an answer.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A document carried metadata that is not a JSON object.
    #[error("Invalid metadata for document {doc_index}: expected an object, found {found}")]
    InvalidMetadata {
        /// Position of the offending document in the ingested batch.
        doc_index: usize,
        /// The JSON type that was supplied instead.
        found: &'static str,
    },

    /// A retrieved match had no `text` field in its metadata.
    #[error("Match '{id}' has no text in its metadata")]
    MissingText {
        /// The record id of the match.
        id: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the ingestion or query pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
