//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::vectorstore::DistanceMetric;

/// Default index name.
pub const DEFAULT_INDEX_NAME: &str = "rag-qa";
/// Default chunk budget in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default number of records per upsert call.
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// Default number of passages retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;
/// Default sampling temperature for answer generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    /// Name of the vector index records are written to and read from.
    pub index_name: String,
    /// Similarity metric used when the index is created.
    pub metric: DistanceMetric,
    /// Character budget per chunk.
    pub chunk_size: usize,
    /// Maximum number of records sent in one upsert call.
    pub batch_size: usize,
    /// Number of passages retrieved when answering.
    pub top_k: usize,
    /// Sampling temperature passed to the generator.
    pub temperature: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            metric: DistanceMetric::Cosine,
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            top_k: DEFAULT_TOP_K,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `index_name` is empty
    /// - `chunk_size`, `batch_size`, or `top_k` is zero
    /// - `temperature` is outside `0.0..=2.0`
    pub fn validate(&self) -> Result<()> {
        if self.index_name.trim().is_empty() {
            return Err(RagError::ConfigError("index_name must not be empty".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if self.batch_size == 0 {
            return Err(RagError::ConfigError("batch_size must be greater than zero".to_string()));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RagError::ConfigError(format!(
                "temperature ({}) must be between 0.0 and 2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the vector index name.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_name = name.into();
        self
    }

    /// Set the similarity metric used when creating the index.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Set the chunk budget in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the maximum number of records per upsert call.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the number of passages retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the generation temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Build the [`RagConfig`], see [`RagConfig::validate`].
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RagConfig::builder().build().unwrap();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.metric, DistanceMetric::Cosine);
    }

    #[test]
    fn rejects_zero_sizes() {
        assert!(RagConfig::builder().chunk_size(0).build().is_err());
        assert!(RagConfig::builder().batch_size(0).build().is_err());
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let err = RagConfig::builder().temperature(2.5).build().unwrap_err();
        assert!(matches!(err, RagError::ConfigError(msg) if msg.contains("temperature")));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: RagConfig =
            serde_json::from_str(r#"{"index_name":"kb","metric":"dot_product"}"#).unwrap();
        assert_eq!(config.index_name, "kb");
        assert_eq!(config.metric, DistanceMetric::DotProduct);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
    }
}
