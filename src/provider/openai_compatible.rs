//! OpenAI Compatible Client
//!
//! Every built-in vendor speaks the OpenAI chat-completions protocol, so one
//! client type covers all of them. Only the endpoint, key and extra headers
//! differ per provider.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, RegistryError};
use crate::model::{ChatMessage, ChatRequest, ChatResponse, LanguageModel, ModelHandle, Usage};

use super::factory::ProviderClient;

/// Configuration for OpenAI-compatible providers
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Provider identifier
    pub provider_id: Cow<'static, str>,
    /// Canonical base endpoint (no trailing slash)
    pub base_url: String,
    /// API key; requests go out unauthenticated when absent
    pub api_key: Option<SecretString>,
    /// Custom headers for requests
    pub custom_headers: reqwest::header::HeaderMap,
}

impl OpenAiCompatibleConfig {
    pub fn new(provider_id: impl Into<Cow<'static, str>>, base_url: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            base_url: base_url.into(),
            api_key: None,
            custom_headers: reqwest::header::HeaderMap::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<SecretString>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, RegistryError> {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| RegistryError::Configuration(format!("Invalid header name '{key}': {e}")))?;
        let header_value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
            RegistryError::Configuration(format!("Invalid header value for '{key}': {e}"))
        })?;

        self.custom_headers.insert(header_name, header_value);
        Ok(self)
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("provider_id", &self.provider_id)
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("custom_headers", &self.custom_headers)
            .finish()
    }
}

/// Client for one OpenAI-compatible vendor.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    config: Arc<OpenAiCompatibleConfig>,
    http_client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(config: OpenAiCompatibleConfig, http_client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http_client,
        }
    }

    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }
}

impl ProviderClient for OpenAiCompatibleClient {
    fn provider_id(&self) -> Cow<'static, str> {
        self.config.provider_id.clone()
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.config.base_url)
    }

    fn model(&self, model_name: &str) -> Result<ModelHandle, RegistryError> {
        if model_name.is_empty() || model_name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidModelName {
                provider: self.config.provider_id.to_string(),
                name: model_name.to_string(),
            });
        }

        Ok(ModelHandle::new(Arc::new(OpenAiCompatibleChatModel {
            config: Arc::clone(&self.config),
            http_client: self.http_client.clone(),
            model: model_name.to_string(),
        })))
    }
}

/// One vendor model behind an [`OpenAiCompatibleClient`].
struct OpenAiCompatibleChatModel {
    config: Arc<OpenAiCompatibleConfig>,
    http_client: reqwest::Client,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    id: Option<String>,
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleChatModel {
    fn provider_id(&self) -> &str {
        &self.config.provider_id
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let mut builder = self
            .http_client
            .post(self.config.chat_url())
            .headers(self.config.custom_headers.clone())
            .json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        tracing::debug!(
            provider = %self.config.provider_id,
            model = %self.model,
            messages = request.messages.len(),
            "Sending chat completion"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(
                provider = %self.config.provider_id,
                status = status.as_u16(),
                "Chat completion failed"
            );
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationError(format!(
                    "{} rejected the request (HTTP {}): {}",
                    self.config.provider_id, status, error_text
                )),
                code => LlmError::ApiError {
                    code,
                    message: format!("HTTP {}: {}", status, error_text),
                    details: serde_json::from_str(&error_text).ok(),
                },
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError("response contained no choices".to_string()))?;

        Ok(ChatResponse {
            id: parsed.id,
            model: parsed.model,
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: parsed.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}
