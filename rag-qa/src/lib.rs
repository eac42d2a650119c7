//! # rag-qa
//!
//! Retrieval-augmented question answering.
//!
//! Documents are split into bounded passages by a [`Chunker`], embedded by an
//! [`EmbeddingProvider`], and written in batches to a [`VectorStore`]. A
//! question is embedded, its nearest passages are retrieved, and a
//! [`Generator`] is asked for an answer grounded only in those passages.
//!
//! The three collaborators are traits injected into [`RagPipeline`]; the
//! crate ships an [`InMemoryVectorStore`] plus optional adapters:
//!
//! | Feature  | Adapter                                                   |
//! |----------|-----------------------------------------------------------|
//! | `openai` | `OpenAIEmbeddingProvider`, `OpenAIGenerator`              |
//! | `qdrant` | `QdrantVectorStore`                                       |
//!
//! No retry, backoff, or timeout is applied to collaborator calls. A failure
//! aborts the current `ingest` or `answer` call and is returned as a
//! [`RagError`].

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod inmemory;
pub mod ingest;
pub mod pipeline;
pub mod query;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use chunking::{Chunker, WordChunker, split_words};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, Metadata, QueryMatch, VectorRecord, record_id};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::Generator;
pub use inmemory::InMemoryVectorStore;
pub use ingest::{IngestReport, IngestionPipeline};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use query::{FALLBACK_ANSWER, QueryEngine, SYSTEM_PROMPT, build_context, build_user_prompt};
pub use vectorstore::{DistanceMetric, VectorStore};

#[cfg(feature = "openai")]
pub use openai::{OpenAIEmbeddingProvider, OpenAIGenerator};
#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
