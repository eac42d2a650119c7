//! # RAG with OpenAI and Qdrant
//!
//! Ingests documents into a Qdrant collection using OpenAI embeddings and
//! answers questions with an OpenAI chat model.
//!
//! Requires `OPENAI_API_KEY`; reads `QDRANT_URL` / `QDRANT_API_KEY` if set
//! (defaults to a local Qdrant at `http://localhost:6334`). A `.env` file in
//! the working directory is loaded first.
//!
//! Run: `cargo run -p rag-qa-demos --example rag_openai_qdrant --features openai,qdrant`

use std::sync::Arc;

use rag_qa::{
    Document, OpenAIEmbeddingProvider, OpenAIGenerator, QdrantVectorStore, RagConfig, RagPipeline,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let index_name = std::env::var("RAG_INDEX").unwrap_or_else(|_| "company-knowledge".into());
    let config = RagConfig::builder().index_name(index_name).build()?;

    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(OpenAIEmbeddingProvider::from_env()?))
        .vector_store(Arc::new(QdrantVectorStore::from_env()?))
        .generator(Arc::new(OpenAIGenerator::from_env()?))
        .open()
        .await?;

    let documents = vec![
        Document::new("TechCorp was founded in 2010 by two engineers in Berlin."),
        Document::new("TechCorp's flagship product is an open-source database for time series."),
        Document::new("The company employs around 300 people across four offices."),
    ];
    let report = pipeline.ingest(&documents).await?;
    info!(records = report.records, "knowledge base ready");

    for question in ["When was TechCorp founded?", "What is the CEO's favourite colour?"] {
        let answer = pipeline.answer(question).await?;
        println!("Q: {question}\nA: {answer}\n");
    }

    Ok(())
}
