use thiserror::Error;

/// Errors that can occur while talking to a completion endpoint.
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("Missing API key for provider '{0}'")]
    MissingApiKey(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Completion returned no text")]
    EmptyResponse,

    #[error("Rate limited. Try again later.")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::Network(err.to_string())
    }
}
