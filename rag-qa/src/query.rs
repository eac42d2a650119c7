//! Retrieval-to-generation query engine.
//!
//! [`QueryEngine`] embeds a question, fetches the nearest passages, joins
//! their text into a context block in the store's rank order, and asks the
//! [`Generator`] for an answer grounded in that context. It keeps no state
//! between calls.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::document::QueryMatch;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::Generator;
use crate::vectorstore::VectorStore;

/// Sentence the model is told to reply with when the context has no answer.
pub const FALLBACK_ANSWER: &str =
    "I cannot answer this question based on the available information.";

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions using only \
     the context provided to you. Do not rely on prior knowledge.";

/// Join the text of each match, in the given order, with single spaces.
///
/// # Errors
///
/// Returns [`RagError::MissingText`] for the first match whose metadata has
/// no string `text` field.
pub fn build_context(matches: &[QueryMatch]) -> Result<String> {
    let texts = matches
        .iter()
        .map(|m| m.text().ok_or_else(|| RagError::MissingText { id: m.id.clone() }))
        .collect::<Result<Vec<&str>>>()?;
    Ok(texts.join(" "))
}

/// Build the user prompt embedding the context block and the question.
pub fn build_user_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question using only the context below. If the answer cannot be \
         derived from the context, respond exactly with: \"{FALLBACK_ANSWER}\"\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Answer:"
    )
}

/// Answers questions from passages stored in a vector index.
pub struct QueryEngine {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    generator: Arc<dyn Generator>,
    index_name: String,
    temperature: f32,
}

impl QueryEngine {
    /// Create a query engine reading from `index_name`.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn Generator>,
        index_name: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            embedding_provider,
            vector_store,
            generator,
            index_name: index_name.into(),
            temperature,
        }
    }

    /// The index queried for passages.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Embed `question` and return up to `top_k` matches with metadata.
    ///
    /// Matches keep the order returned by the vector store.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `top_k` is zero, or
    /// [`RagError::PipelineError`] if embedding or search fails.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<QueryMatch>> {
        if top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }

        let embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let matches =
            self.vector_store.query(&self.index_name, &embedding, top_k, true).await.map_err(
                |e| {
                    error!(index = %self.index_name, error = %e, "vector store query failed");
                    RagError::PipelineError(format!(
                        "query failed in index '{}': {e}",
                        self.index_name
                    ))
                },
            )?;

        debug!(top_k, match_count = matches.len(), "retrieved matches");
        Ok(matches)
    }

    /// Answer `question` from the `top_k` nearest passages.
    ///
    /// Returns the generator's output verbatim. With no matches the context
    /// block is empty and the prompt still carries the fallback instruction.
    ///
    /// # Errors
    ///
    /// Propagates retrieval errors, [`RagError::MissingText`] for a match
    /// without text, and [`RagError::PipelineError`] if generation fails.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<String> {
        let matches = self.retrieve(question, top_k).await?;
        let context = build_context(&matches)?;
        let user_prompt = build_user_prompt(&context, question);

        let answer = self
            .generator
            .complete(SYSTEM_PROMPT, &user_prompt, self.temperature)
            .await
            .map_err(|e| {
                error!(error = %e, "generation failed");
                RagError::PipelineError(format!("answer generation failed: {e}"))
            })?;

        info!(
            match_count = matches.len(),
            context_len = context.len(),
            answer_len = answer.len(),
            "answered question"
        );
        Ok(answer)
    }
}
