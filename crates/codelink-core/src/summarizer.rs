//! Code summarization backed by a text-completion model.
//!
//! Summaries never block ingestion: any model failure is logged and replaced
//! by a fixed fallback string.

use async_trait::async_trait;

use crate::config::{LLMConfig, CHAT_FALLBACK, SUMMARY_FALLBACK, SUMMARY_PROMPT};
use crate::llm::{LLMError, Provider, LLM};

/// Short natural-language descriptions of code, plus free-form chat.
///
/// Both methods are infallible from the caller's point of view.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// One or two sentences describing `code`.
    async fn summarize(&self, code: &str) -> String;

    /// Free-form answer to `prompt`.
    async fn chat(&self, prompt: &str) -> String;
}

/// Summarizer that delegates to an [`LLM`] client.
pub struct LlmSummarizer<L: LLM> {
    llm: L,
}

impl<L: LLM> LlmSummarizer<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl<L: LLM> Summarizer for LlmSummarizer<L> {
    async fn summarize(&self, code: &str) -> String {
        match self.llm.complete_with_system(SUMMARY_PROMPT, code).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => SUMMARY_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "summarization failed, using fallback");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    async fn chat(&self, prompt: &str) -> String {
        match self.llm.complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "chat completion failed, using fallback");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

/// Offline summarizer used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSummarizer;

#[async_trait]
impl Summarizer for PlaceholderSummarizer {
    async fn summarize(&self, _code: &str) -> String {
        SUMMARY_FALLBACK.to_string()
    }

    async fn chat(&self, _prompt: &str) -> String {
        CHAT_FALLBACK.to_string()
    }
}

/// Build the summarizer described by the LLM section of the config.
///
/// Provider `none` yields a [`PlaceholderSummarizer`].
pub fn from_config(config: &LLMConfig) -> Result<Box<dyn Summarizer>, LLMError> {
    match Provider::from_config(config)? {
        Some(provider) => {
            tracing::debug!(provider = %config.provider, model = %config.model_or_default(), "using LLM summarizer");
            Ok(Box::new(LlmSummarizer::new(provider.build()?)))
        }
        None => Ok(Box::new(PlaceholderSummarizer)),
    }
}
