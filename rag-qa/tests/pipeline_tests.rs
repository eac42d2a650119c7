//! End-to-end tests of the `RagPipeline` facade over the in-memory store.

mod common;

use std::sync::Arc;

use common::{DIM, EchoGenerator, HashEmbedder, RecordingStore};
use rag_qa::{
    Document, FALLBACK_ANSWER, InMemoryVectorStore, RagConfig, RagError, RagPipeline, VectorStore,
};

fn documents() -> Vec<Document> {
    vec![
        Document::new("TechCorp was founded in 2010."),
        Document::new("TechCorp headquarters are located in Berlin."),
        Document::new("The cafeteria serves lunch from noon until two."),
    ]
}

#[tokio::test]
async fn open_creates_index_then_ingest_and_answer() {
    let store = Arc::new(RecordingStore::new());
    let generator = Arc::new(EchoGenerator::new());
    let pipeline = RagPipeline::builder()
        .config(RagConfig::builder().index_name("kb").top_k(1).build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(store.clone())
        .generator(generator.clone())
        .open()
        .await
        .unwrap();

    let report = pipeline.ingest(&documents()).await.unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(store.upserted_ids(), vec!["doc_0_chunk_0", "doc_1_chunk_0", "doc_2_chunk_0"]);

    // Identical text embeds identically, so the exact sentence ranks first.
    let answer = pipeline.answer("TechCorp headquarters are located in Berlin.").await.unwrap();

    assert!(answer.contains("Context:\nTechCorp headquarters are located in Berlin."));
    assert!(answer.contains(FALLBACK_ANSWER));
    assert_eq!(*store.queries.lock().unwrap(), vec![(1, true)]);
    assert_eq!(generator.calls.lock().unwrap()[0].2, pipeline.config().temperature);
}

#[tokio::test]
async fn answer_with_top_k_overrides_config() {
    let store = Arc::new(RecordingStore::new());
    let pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(store.clone())
        .generator(Arc::new(EchoGenerator::new()))
        .open()
        .await
        .unwrap();
    pipeline.ingest(&documents()).await.unwrap();

    pipeline.answer("lunch").await.unwrap();
    let matches = pipeline.retrieve("lunch", 2).await.unwrap();
    pipeline.answer_with_top_k("lunch", 5).await.unwrap();

    assert_eq!(matches.len(), 2);
    let top_ks: Vec<usize> = store.queries.lock().unwrap().iter().map(|q| q.0).collect();
    assert_eq!(top_ks, vec![3, 2, 5]);
}

#[tokio::test]
async fn configured_chunk_and_batch_sizes_are_used() {
    let store = Arc::new(RecordingStore::new());
    let pipeline = RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(10).batch_size(2).build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(store.clone())
        .generator(Arc::new(EchoGenerator::new()))
        .open()
        .await
        .unwrap();

    let report = pipeline.ingest(&[Document::new("alpha beta gamma delta")]).await.unwrap();

    // alpha | beta gamma | delta
    assert_eq!(report.records, 3);
    assert_eq!(store.batch_sizes(), vec![2, 1]);
}

#[tokio::test]
async fn ingest_without_open_fails_on_missing_index() {
    let pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .generator(Arc::new(EchoGenerator::new()))
        .build()
        .unwrap();

    let err = pipeline.ingest(&documents()).await.unwrap_err();

    assert!(matches!(err, RagError::PipelineError(_)));
}

#[tokio::test]
async fn open_uses_embedder_dimensions() {
    let store = Arc::new(InMemoryVectorStore::new());
    RagPipeline::builder()
        .config(RagConfig::builder().index_name("dims").build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(store.clone())
        .generator(Arc::new(EchoGenerator::new()))
        .open()
        .await
        .unwrap();

    let err = store.query("dims", &[0.5; DIM + 1], 1, true).await.unwrap_err();
    assert!(err.to_string().contains(&format!("expects {DIM} dimensions")));
}

#[test]
fn builder_requires_collaborators() {
    let missing_generator = RagPipeline::builder()
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build();
    assert!(
        matches!(missing_generator, Err(RagError::ConfigError(msg)) if msg.contains("generator"))
    );

    let missing_store = RagPipeline::builder()
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .generator(Arc::new(EchoGenerator::new()))
        .build();
    assert!(matches!(missing_store, Err(RagError::ConfigError(_))));
}

#[test]
fn builder_validates_config() {
    let config = RagConfig { batch_size: 0, ..RagConfig::default() };

    let result = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(HashEmbedder::new()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .generator(Arc::new(EchoGenerator::new()))
        .build();

    assert!(matches!(result, Err(RagError::ConfigError(msg)) if msg.contains("batch_size")));
}
