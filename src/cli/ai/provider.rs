//! The seam between topic suggestions and whatever model answers them.

use super::{AiResponse, ChatMessage};
use anyhow::{anyhow, Result};

/// A chat-completion backend
pub trait AiProvider: Send + Sync {
    fn complete(&self, messages: &[ChatMessage]) -> Result<AiResponse>;

    /// Shown in logs when the provider fails
    fn name(&self) -> &str;

    fn is_ready(&self) -> bool;

    /// Trimmed reply text. A reply with no text is an error.
    fn complete_text(&self, messages: &[ChatMessage]) -> Result<String> {
        self.complete(messages)?
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow!("empty response"))
    }
}
