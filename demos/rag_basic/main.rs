//! # RAG Basic Example
//!
//! Ingests a handful of documents and answers questions about them.
//!
//! Uses `InMemoryVectorStore`, a deterministic hash-based embedder, and a
//! generator that simply quotes the retrieved context, so it runs with
//! **zero API keys**.
//!
//! Run: `cargo run -p rag-qa-demos --example rag_basic`

use std::sync::Arc;

use rag_qa::{
    Document, EmbeddingProvider, FALLBACK_ANSWER, Generator, InMemoryVectorStore, Metadata,
    RagConfig, RagPipeline,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// MockEmbeddingProvider: deterministic hash-based embeddings
// ---------------------------------------------------------------------------

struct MockEmbeddingProvider {
    dimensions: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> rag_qa::Result<Vec<f32>> {
        // Bag-of-words hashing: texts sharing words point in similar directions.
        let mut emb = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            let hash =
                word.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            emb[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// QuotingGenerator: answers with the retrieved context verbatim
// ---------------------------------------------------------------------------

struct QuotingGenerator;

#[async_trait::async_trait]
impl Generator for QuotingGenerator {
    async fn complete(&self, _system: &str, user: &str, _temperature: f32) -> rag_qa::Result<String> {
        let context = user
            .split_once("Context:\n")
            .and_then(|(_, rest)| rest.split_once("\n\nQuestion:"))
            .map(|(context, _)| context.trim())
            .unwrap_or_default();
        if context.is_empty() {
            return Ok(FALLBACK_ANSWER.to_string());
        }
        Ok(format!("According to the knowledge base: {context}"))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // -- 1. Configure and open the pipeline -------------------------------
    // A small chunk budget so the longer document is split into passages.
    let config = RagConfig::builder().index_name("handbook").chunk_size(120).top_k(2).build()?;

    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(MockEmbeddingProvider { dimensions: 256 }))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .generator(Arc::new(QuotingGenerator))
        .open()
        .await?;

    // -- 2. Ingest sample documents ---------------------------------------
    let mut source = Metadata::new();
    source.insert("source".into(), json!("employee-handbook"));

    let documents = vec![
        Document::new("TechCorp was founded in 2010 by two engineers in a Berlin garage.")
            .with_metadata(source.clone()),
        Document::new(
            "Employees receive 25 days of paid vacation per year. Unused vacation days \
             can be carried over until the end of March of the following year. Requests \
             are approved by the team lead through the HR portal.",
        )
        .with_metadata(source),
        Document::new("The cafeteria serves lunch from noon until two on weekdays."),
    ];

    let report = pipeline.ingest(&documents).await?;
    println!(
        "Ingested {} documents as {} records in {} batch(es)",
        report.documents, report.records, report.batches
    );

    // -- 3. Ask questions -------------------------------------------------
    let questions =
        ["When was TechCorp founded?", "How many vacation days do employees get?", "lunch hours"];

    for question in questions {
        println!("\nQ: {question}");
        for m in pipeline.retrieve(question, 2).await? {
            println!("  [score={:.3}] {}", m.score, m.id);
        }
        println!("A: {}", pipeline.answer(question).await?);
    }

    Ok(())
}
