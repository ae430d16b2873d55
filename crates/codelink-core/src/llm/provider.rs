use super::{LLMError, OpenAIClient, LLM};
use crate::config::{LLMConfig, DEFAULT_OLLAMA_MODEL};

/// LLM provider configuration.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Hosted OpenAI-compatible endpoint.
    OpenAI {
        base_url: String,
        api_key: Option<String>,
        model: String,
        max_tokens: u32,
    },
    /// Local Ollama instance.
    Ollama {
        base_url: Option<String>,
        model: String,
    },
}

impl Provider {
    /// Creates a provider from LLMConfig.
    ///
    /// Returns `None` when the provider is `"none"`.
    pub fn from_config(config: &LLMConfig) -> Result<Option<Self>, LLMError> {
        match config.provider.as_str() {
            "none" => Ok(None),
            "ollama" => Ok(Some(Provider::Ollama {
                base_url: config.base_url.clone(),
                model: config.model_or_default(),
            })),
            "openai" => Ok(Some(Provider::OpenAI {
                base_url: config.base_url_or_default(),
                api_key: config.api_key_or_env(),
                model: config.model_or_default(),
                max_tokens: config.max_tokens,
            })),
            other => Err(LLMError::UnknownProvider(other.to_string())),
        }
    }

    /// Creates an LLM client from the provider configuration.
    pub fn build(self) -> Result<Box<dyn LLM>, LLMError> {
        match self {
            Provider::OpenAI {
                base_url,
                api_key,
                model,
                max_tokens,
            } => {
                let key = api_key.ok_or_else(|| LLMError::MissingApiKey("openai".to_string()))?;
                Ok(Box::new(
                    OpenAIClient::new(base_url, key, model).with_max_tokens(max_tokens),
                ))
            }
            Provider::Ollama { base_url, model } => {
                let client = match base_url.or_else(|| std::env::var("OLLAMA_HOST").ok()) {
                    Some(host) => {
                        let host = host.trim_end_matches('/');
                        let base = if host.ends_with("/v1") {
                            host.to_string()
                        } else {
                            format!("{}/v1", host)
                        };
                        OpenAIClient::new(base, "", model)
                    }
                    None => OpenAIClient::ollama(model),
                };
                Ok(Box::new(client))
            }
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Ollama {
            base_url: None,
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}
