//! Blocking chat-completions client for topic suggestions.
//!
//! One request per due contact, bounded by `AI_TIMEOUT_SECS` and
//! `AI_MAX_TOKENS`. Any OpenAI-compatible endpoint works.

use super::{provider::AiProvider, AiConfig, AiResponse, ChatMessage};
use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Remote AI provider using OpenAI-compatible API
pub struct RemoteProvider {
    client: Client,
    api_url: String,
    api_endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl RemoteProvider {
    /// Create a new remote provider from configuration
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("API key not configured"))?;

        let client = Client::builder()
            .timeout(config.effective_timeout())
            .build()?;

        Ok(Self {
            client,
            api_url: config.effective_api_url().trim_end_matches('/').to_string(),
            api_endpoint: config.effective_api_endpoint().to_string(),
            api_key,
            model: config.effective_model().to_string(),
            max_tokens: config.effective_max_tokens(),
        })
    }

    /// Build the full API URL
    fn full_url(&self) -> String {
        format!("{}{}", self.api_url, self.api_endpoint)
    }
}

impl AiProvider for RemoteProvider {
    fn complete(&self, messages: &[ChatMessage]) -> Result<AiResponse> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.full_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("API error {}: {}", status, body));
        }

        let completion: CompletionResponse = response.json()?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No completion choices returned"))?;

        Ok(AiResponse {
            content: choice.message.content,
        })
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// OpenAI API request/response types

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
