use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LLMError, LLM};
use crate::config::DEFAULT_MAX_TOKENS;

/// Client for the OpenAI chat completions protocol.
///
/// Ollama exposes the same protocol under `/v1`, so one client covers both
/// hosted and local models.
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl OpenAIClient {
    /// Creates a new client.
    ///
    /// `api_key` may be empty for local endpoints.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: Client::new(),
        }
    }

    /// Client for a local Ollama server.
    pub fn ollama(model: impl Into<String>) -> Self {
        Self::new(crate::config::DEFAULT_OLLAMA_URL, "", model)
    }

    /// Sets the maximum tokens for responses.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Model this client sends requests to.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: Option<&str>, prompt: &str) -> Result<String, LLMError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage::new("system", sys));
        }
        messages.push(ChatMessage::new("user", prompt));

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(self.max_tokens),
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut req = self.client.post(&url).header("content-type", "application/json");
        if !self.api_key.is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.api_key));
        }

        let response = req.json(&request).send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LLMError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl LLM for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        self.chat(None, prompt).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        self.chat(Some(system), prompt).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client() {
        let client = OpenAIClient::ollama("qwen2.5:3b-instruct");
        assert_eq!(client.base_url, "http://localhost:11434/v1");
        assert_eq!(client.model(), "qwen2.5:3b-instruct");
        assert!(client.api_key.is_empty());
    }

    #[test]
    fn test_url_trailing_slash_removed() {
        let client = OpenAIClient::new("https://api.example.com/v1/", "key", "model");
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn test_request_omits_unset_max_tokens() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::new("user", "hi")],
            max_tokens: None,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":" Adds two numbers. "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.trim(), "Adds two numbers.");
    }
}
