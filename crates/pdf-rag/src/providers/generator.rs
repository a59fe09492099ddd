//! Generator provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based text generation
///
/// No determinism contract: implementations may sample.
#[async_trait]
pub trait GeneratorProvider: Send + Sync {
    /// Generate text for a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
