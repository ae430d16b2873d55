use codelink_core::config::{LLMConfig, DEFAULT_OLLAMA_MODEL};
use codelink_core::llm::{LLMError, OpenAIClient, Provider};

// OpenAI-compatible client tests
mod openai {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAIClient::new("https://api.example.com/v1", "test-key", "gpt-4o-mini");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_ollama_client() {
        let client = OpenAIClient::ollama(DEFAULT_OLLAMA_MODEL);
        assert_eq!(client.model(), DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_url_trailing_slash_removed() {
        let _client = OpenAIClient::new("https://api.example.com/v1/", "key", "model")
            .with_max_tokens(64);
    }
}

// Provider tests
mod provider {
    use super::*;

    #[test]
    fn test_default_provider() {
        assert!(matches!(Provider::default(), Provider::Ollama { .. }));
    }

    #[test]
    fn test_openai_provider_build() {
        let provider = Provider::OpenAI {
            base_url: "http://localhost:8080/v1".to_string(),
            api_key: Some("test".to_string()),
            model: "local-model".to_string(),
            max_tokens: 256,
        };
        assert!(provider.build().is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        let config = LLMConfig {
            provider: "bard".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Provider::from_config(&config),
            Err(LLMError::UnknownProvider(name)) if name == "bard"
        ));
    }

    #[test]
    fn test_openai_from_config() {
        let config = LLMConfig {
            provider: "openai".to_string(),
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let provider = Provider::from_config(&config).unwrap().unwrap();
        assert!(matches!(provider, Provider::OpenAI { api_key: Some(ref k), .. } if k == "sk-test"));
    }
}
