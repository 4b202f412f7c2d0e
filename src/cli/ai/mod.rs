//! Optional AI topic suggestions
//!
//! # What the provider sees
//!
//! Only the fields gathered in [`TopicPrompt`]: the contact's name,
//! birthday, residence, hobbies, a short importance summary of the most
//! recent conversations and the free-text note. Nothing else from the
//! store is sent, and nothing the provider returns is written back.
//!
//! Providers speak the OpenAI-compatible chat completions API.

mod config;
mod provider;
mod remote;
mod suggest;

pub use config::{
    AiConfig, ENV_AI_API_ENDPOINT, ENV_AI_API_KEY, ENV_AI_API_URL, ENV_AI_MAX_TOKENS,
    ENV_AI_MODEL, ENV_AI_TIMEOUT_SECS,
};
pub use provider::AiProvider;
pub use remote::RemoteProvider;
pub use suggest::{Suggestion, TopicPrompt, TopicSuggester};

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
        }
    }
}

/// Response from an AI provider
#[derive(Debug, Clone)]
pub struct AiResponse {
    /// Text content from the assistant
    pub content: Option<String>,
}

impl AiResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}
