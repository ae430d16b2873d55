//! Text-completion backends used by the summarizer.

mod error;
mod openai;
mod provider;

pub use error::LLMError;
pub use openai::OpenAIClient;
pub use provider::Provider;

use async_trait::async_trait;

/// Trait for Large Language Model providers.
///
/// Both supported providers speak the OpenAI chat completions protocol:
///
/// - **Ollama** (default): local models, no API key
/// - **OpenAI**: any OpenAI-compatible endpoint
///
/// # Example
///
/// ```ignore
/// use codelink_core::llm::{Provider, LLM};
///
/// let llm = Provider::Ollama {
///     base_url: None,
///     model: "qwen2.5:3b-instruct".to_string(),
/// }.build()?;
///
/// let response = llm.complete("Hello!").await?;
/// ```
#[async_trait]
pub trait LLM: Send + Sync {
    /// Complete a prompt and return the response.
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;

    /// Complete a prompt with a system message.
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError>;
}

#[async_trait]
impl LLM for Box<dyn LLM> {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        (**self).complete(prompt).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }
}
