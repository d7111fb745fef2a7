//! Text-completion service boundary.
//!
//! The extraction pipeline only needs "ordered messages in, model name and
//! text out", expressed by [`CompletionClient`]. [`OpenAiClient`] speaks the
//! OpenAI-compatible `chat/completions` protocol over blocking HTTP.

pub mod error;
pub mod openai;

pub use error::CompletionError;
pub use openai::{OpenAiClient, OpenAiConfig};

use serde::{Deserialize, Serialize};

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One prompt message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A completion as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Model name the service reports having used.
    pub model: String,
    /// Text of the first choice.
    pub text: String,
}

/// A service that answers an ordered list of messages with text.
pub trait CompletionClient {
    fn respond(&self, messages: &[Message]) -> Result<Completion, CompletionError>;
}
