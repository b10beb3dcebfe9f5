//! DeepSeek adapter (reasoning and analysis requests)
//!
//! Talks to a generic chat-completions endpoint: a plain HTTP client, the
//! bearer token attached per request, and the JSON envelope parsed by hand.

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::{
    config::{ModelChoice, ModelProfile},
    error::{GentleError, Result},
};

use super::{
    openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage},
    status_error, ModelAdapter, Reply,
};

/// DeepSeek API adapter
pub struct DeepSeekAdapter {
    client: Client,
    profile: ModelProfile,
}

impl DeepSeekAdapter {
    /// Create a new DeepSeek adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(profile: ModelProfile) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, profile })
    }
}

#[async_trait]
impl ModelAdapter for DeepSeekAdapter {
    fn choice(&self) -> ModelChoice {
        ModelChoice::Reasoning
    }

    fn label(&self) -> &str {
        &self.profile.label
    }

    fn model(&self) -> &str {
        &self.profile.model_name
    }

    async fn complete(&self, message: &str) -> Result<Reply> {
        let api_key = self
            .profile
            .api_key
            .as_deref()
            .ok_or_else(|| GentleError::MissingApiKey {
                provider: self.profile.label.clone(),
            })?;

        let request = ChatCompletionRequest {
            model: self.profile.model_name.clone(),
            messages: vec![ChatMessage::user(message)],
            max_tokens: Some(self.profile.max_tokens),
            max_completion_tokens: None,
            temperature: Some(self.profile.temperature),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.profile.base_url))
            .bearer_auth(api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(&self.profile.label, status, &body));
        }

        let envelope: ChatCompletionResponse = serde_json::from_str(&body)?;
        envelope.into_reply(&self.profile.label)
    }
}
