//! Text-generation provider clients

use crate::ai_sql::config::{AiProviderType, AiSqlConfig};
use crate::ai_sql::error::{AiError, AiResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// A remote model that turns an instruction prompt plus user text into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt/user-text pair and return the raw response text
    async fn generate(&self, system_prompt: &str, user_text: &str) -> AiResult<String>;

    /// Get provider name
    fn name(&self) -> &str;
}

fn build_http_client(timeout_seconds: u64) -> AiResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| AiError::NetworkError(format!("Failed to create HTTP client: {}", e)))
}

async fn error_for_status(response: reqwest::Response) -> AiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AiError::ApiError {
        status_code: status.as_u16(),
        message: error_text,
    })
}

/// Google Gemini provider.
///
/// The prompt and the user text travel as two parts of a single user turn.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiProvider {
    pub fn new(api_key: String, config: &AiSqlConfig) -> AiResult<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_seconds)?,
            api_key,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, system_prompt: &str, user_text: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![
                    GeminiPart {
                        text: system_prompt.to_string(),
                    },
                    GeminiPart {
                        text: user_text.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, system_prompt: &str, user_text: &str) -> AiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!(
            "Calling Gemini API with model: {}, prompt: {} chars, user text: {} chars",
            self.model,
            system_prompt.len(),
            user_text.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(system_prompt, user_text))
            .send()
            .await
            .map_err(|e| AiError::NetworkError(format!("Request failed: {}", e)))?;

        let text = error_for_status(response).await?.text().await?;
        let body: GeminiResponse = serde_json::from_str(&text)?;

        body.into_text()
    }

    fn name(&self) -> &str {
        "Google Gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> AiResult<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AiError::ProviderError("No content in response".to_string()));
        }
        Ok(text)
    }
}

/// Anthropic Claude provider: the prompt becomes the system prompt
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(api_key: String, config: &AiSqlConfig) -> AiResult<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_seconds)?,
            api_key,
            base_url: config.anthropic_base_url.trim_end_matches('/').to_string(),
            model: config.anthropic_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    async fn generate(&self, system_prompt: &str, user_text: &str) -> AiResult<String> {
        let url = format!("{}/v1/messages", self.base_url);

        let request_body = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: Some(system_prompt.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user_text.to_string(),
            }],
        };

        debug!(
            "Calling Anthropic API with model: {}, max_tokens: {}, temperature: {}",
            self.model, self.max_tokens, self.temperature
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(format!("Request failed: {}", e)))?;

        let text = error_for_status(response).await?.text().await?;
        let response_body: AnthropicResponse = serde_json::from_str(&text)?;

        response_body
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| AiError::ProviderError("No content in response".to_string()))
    }

    fn name(&self) -> &str {
        "Anthropic Claude"
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Create the text generator selected by the configuration
pub fn create_text_generator(config: &AiSqlConfig) -> AiResult<Box<dyn TextGenerator>> {
    let missing_key = |provider: AiProviderType| {
        AiError::ConfigurationError(format!(
            "{} is not set",
            provider.api_key_env_var()
        ))
    };

    let generator: Box<dyn TextGenerator> = match config.provider {
        AiProviderType::Gemini => {
            let api_key = config
                .get_gemini_api_key()
                .ok_or_else(|| missing_key(AiProviderType::Gemini))?;
            Box::new(GeminiProvider::new(api_key, config)?)
        }
        AiProviderType::Anthropic => {
            let api_key = config
                .get_anthropic_api_key()
                .ok_or_else(|| missing_key(AiProviderType::Anthropic))?;
            Box::new(AnthropicProvider::new(api_key, config)?)
        }
    };

    info!(
        "Using {} with model {}",
        generator.name(),
        config.model()
    );
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gemini() -> GeminiProvider {
        let config = AiSqlConfig {
            max_tokens: 256,
            ..AiSqlConfig::default()
        };
        GeminiProvider::new("test-key".to_string(), &config).unwrap()
    }

    #[test]
    fn test_gemini_request_carries_both_segments() {
        let body = serde_json::to_value(gemini().request_body("PROMPT", "question")).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [{"text": "PROMPT"}, {"text": "question"}]
                }],
                "generationConfig": {"temperature": 0.0, "maxOutputTokens": 256}
            })
        );
    }

    #[test]
    fn test_gemini_response_text_is_joined() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "```sql\nSELECT "}, {"text": "1;\n```"}]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(response.into_text().unwrap(), "```sql\nSELECT 1;\n```");
    }

    #[test]
    fn test_malformed_response_is_a_serialization_error() {
        let err: AiError = serde_json::from_str::<AnthropicResponse>("{\"content\": 7}")
            .unwrap_err()
            .into();

        assert!(matches!(err, AiError::SerializationError(_)));
        assert!(err.user_message().starts_with("Serialization error:"));
    }

    #[test]
    fn test_gemini_empty_response_is_an_error() {
        let response: GeminiResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();

        assert!(matches!(
            response.into_text(),
            Err(AiError::ProviderError(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let config = AiSqlConfig {
            anthropic_base_url: "http://localhost:8080/".to_string(),
            ..AiSqlConfig::default()
        };
        let provider = AnthropicProvider::new("k".to_string(), &config).unwrap();
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.name(), "Anthropic Claude");
    }

    #[test]
    fn test_create_with_configured_key() {
        let config = AiSqlConfig {
            gemini_api_key: Some("from-config".to_string()),
            ..AiSqlConfig::default()
        };
        let generator = create_text_generator(&config).unwrap();
        assert_eq!(generator.name(), "Google Gemini");
    }
}
