//! Chat-completion backends
//!
//! The HTTP layer talks to the model through [`ChatModel`]; the shipped
//! implementation is [`OllamaClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    /// Base64-encoded images attached to this message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }
}

/// A chat-completion model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Send the conversation and return the assistant's reply text.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

mod ollama;

pub use ollama::*;
