//! Text generation trait used to produce grounded answers.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that completes a system + user prompt pair.
///
/// The query engine calls this exactly once per answer and returns the
/// output verbatim. No retry, backoff, or timeout is applied around the
/// call; wrap the implementation if that policy is needed.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete the prompt at the given sampling temperature.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;
}
