//! Error types for AI SQL generation

use thiserror::Error;

/// Result type for AI SQL operations
pub type AiResult<T> = Result<T, AiError>;

/// Errors that can occur while generating SQL from prose
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status_code} - {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl AiError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AiError::ProviderError(msg) => format!("AI provider error: {}", msg),
            AiError::ConfigurationError(msg) => {
                format!(
                    "Configuration issue: {}. Check your config file, .env file or environment variables.",
                    msg
                )
            }
            AiError::SchemaError(msg) => format!("Schema problem: {}", msg),
            AiError::EmptyInput(what) => format!("Please provide {}.", what),
            AiError::NetworkError(msg) => {
                format!("Network error: {}. Check your internet connection.", msg)
            }
            AiError::ApiError {
                status_code,
                message,
            } => format!("API error ({}): {}", status_code, message),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AiError::ApiError {
            status_code: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.user_message(), "API error (403): API key not valid");

        let err = AiError::EmptyInput("a description");
        assert_eq!(err.user_message(), "Please provide a description.");

        let err = AiError::ConfigurationError("GEMINI_API_KEY is not set".to_string());
        assert!(err.user_message().contains(".env"));
    }
}
