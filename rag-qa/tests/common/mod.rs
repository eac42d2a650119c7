//! Deterministic test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use rag_qa::{
    DistanceMetric, EmbeddingProvider, Generator, InMemoryVectorStore, Metadata, QueryMatch,
    RagError, Result, VectorRecord, VectorStore,
};
use serde_json::json;

pub const DIM: usize = 16;

/// Hash-based embeddings: identical text gives identical vectors.
#[derive(Default)]
pub struct HashEmbedder {
    pub texts: Mutex<Vec<String>>,
    /// Fail when asked to embed text containing this marker.
    pub poison: Option<String>,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poisoned(marker: &str) -> Self {
        Self { texts: Mutex::new(Vec::new()), poison: Some(marker.to_string()) }
    }

    pub fn calls(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

pub fn hash_embedding(text: &str) -> Vec<f32> {
    let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let mut emb: Vec<f32> = (0..DIM as u64)
        .map(|i| (splitmix64(hash ^ i) >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0)
        .collect();
    let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        emb.iter_mut().for_each(|x| *x /= norm);
    }
    emb
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(marker) = &self.poison {
            if text.contains(marker.as_str()) {
                return Err(RagError::EmbeddingError {
                    provider: "Hash".into(),
                    message: format!("refusing to embed '{text}'"),
                });
            }
        }
        self.texts.lock().unwrap().push(text.to_string());
        Ok(hash_embedding(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Wraps an [`InMemoryVectorStore`] and records every call made to it.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: InMemoryVectorStore,
    pub batches: Mutex<Vec<Vec<String>>>,
    pub queries: Mutex<Vec<(usize, bool)>>,
    /// Fail the upsert call with this (zero-based) ordinal.
    pub fail_upsert_at: Option<usize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(call: usize) -> Self {
        Self { fail_upsert_at: Some(call), ..Self::default() }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn upserted_ids(&self) -> Vec<String> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn ensure_index(
        &self,
        name: &str,
        dimensions: usize,
        metric: DistanceMetric,
    ) -> Result<()> {
        self.inner.ensure_index(name, dimensions, metric).await
    }

    async fn upsert(&self, index: &str, records: &[VectorRecord]) -> Result<()> {
        let ordinal = self.batches.lock().unwrap().len();
        if self.fail_upsert_at == Some(ordinal) {
            return Err(RagError::VectorStoreError {
                backend: "Recording".into(),
                message: "upsert rejected".into(),
            });
        }
        self.inner.upsert(index, records).await?;
        self.batches.lock().unwrap().push(records.iter().map(|r| r.id.clone()).collect());
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        self.queries.lock().unwrap().push((top_k, include_metadata));
        self.inner.query(index, vector, top_k, include_metadata).await
    }
}

/// Returns a fixed list of matches (truncated to `top_k`) for every query.
#[derive(Default)]
pub struct ScriptedStore {
    pub matches: Vec<QueryMatch>,
    pub queries: Mutex<Vec<(usize, bool)>>,
}

impl ScriptedStore {
    pub fn new(matches: Vec<QueryMatch>) -> Self {
        Self { matches, queries: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    async fn ensure_index(&self, _: &str, _: usize, _: DistanceMetric) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, _: &str, _: &[VectorRecord]) -> Result<()> {
        Ok(())
    }

    async fn query(
        &self,
        _index: &str,
        _vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<QueryMatch>> {
        self.queries.lock().unwrap().push((top_k, include_metadata));
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

pub fn text_match(id: &str, score: f32, text: &str) -> QueryMatch {
    let mut metadata = Metadata::new();
    metadata.insert("text".into(), json!(text));
    QueryMatch { id: id.into(), score, metadata }
}

/// A generator that echoes its prompts back and records each call.
#[derive(Default)]
pub struct EchoGenerator {
    pub calls: Mutex<Vec<(String, String, f32)>>,
}

impl EchoGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_user_prompt(&self) -> String {
        self.calls.lock().unwrap().last().map(|c| c.1.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String> {
        self.calls.lock().unwrap().push((
            system_prompt.to_string(),
            user_prompt.to_string(),
            temperature,
        ));
        Ok(format!("{system_prompt}\n{user_prompt}"))
    }
}

/// A generator that always fails.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String> {
        Err(RagError::GenerationError { provider: "Failing".into(), message: "rate limited".into() })
    }
}
