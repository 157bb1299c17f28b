use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::LlmError;

/// Roles in a chat-completion request. The agent only ever sends system
/// and user messages; assistant turns live in the interwoven history text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
}

/// A complete chat-completion request: model name plus ordered messages.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }

    /// The common two-message shape: one system prompt, one user prompt.
    pub fn prompted(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self::new(model, vec![ChatMessage::system(system), ChatMessage::user(user)])
    }
}

/// Trait implemented by each chat-completion backend.
///
/// `complete` resolves to the first choice's message text. Rate limiting
/// must surface as `LlmError::RateLimited` so callers can apply a retry
/// policy; all other failures are surfaced as-is.
#[async_trait]
pub trait ChatClient: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}
