//! Model Client boundary.
//!
//! The rest of the crate talks to the hosted model through the [`LlmClient`]
//! trait; the production implementation is [`GroqClient`]. Tests substitute
//! scripted clients.

mod groq;

pub use groq::GroqClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat message roles understood by OpenAI-compatible providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Failures at the model-provider boundary.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty reply")]
    EmptyResponse,
}

/// A hosted chat model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat-completion request and return the assistant's reply text.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
