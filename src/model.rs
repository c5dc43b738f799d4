//! Model handles and chat-completion types.
//!
//! A [`ModelHandle`] is the invocable unit the registry hands out: one
//! concrete remote model behind a shared, read-only provider client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A non-streaming chat-completion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Single user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(content)])
    }

    /// Prepend a system prompt.
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.insert(0, ChatMessage::system(content));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token accounting reported by the vendor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A completed chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: Option<String>,
    /// Model name echoed by the vendor.
    pub model: Option<String>,
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

/// A concrete remote model that can perform chat completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider tag of the client that produced this model.
    fn provider_id(&self) -> &str;

    /// Vendor-model-name sent on the wire.
    fn model_id(&self) -> &str;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Cheap-to-clone handle around a [`LanguageModel`].
#[derive(Clone)]
pub struct ModelHandle {
    model: Arc<dyn LanguageModel>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Inspectable provider tag.
    pub fn provider(&self) -> &str {
        self.model.provider_id()
    }

    /// Vendor-model-name this handle targets.
    pub fn model_name(&self) -> &str {
        self.model.model_id()
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.model.chat(request).await
    }

    /// Whether two handles share the same underlying model instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.model, &other.model)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("provider", &self.provider())
            .field("model", &self.model_name())
            .finish()
    }
}

static_assertions::assert_impl_all!(ModelHandle: Send, Sync, Clone);
