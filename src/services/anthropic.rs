//! Anthropic Claude API adapter (creative writing requests)

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ModelChoice, ModelProfile},
    error::{GentleError, Result},
};

use super::{status_error, usage_from_value, ModelAdapter, Reply};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API adapter
pub struct AnthropicAdapter {
    client: Client,
    profile: ModelProfile,
}

impl AnthropicAdapter {
    /// Create a new Anthropic adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the client
    /// cannot be built
    pub fn new(profile: ModelProfile) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(api_key) = &profile.api_key {
            headers.insert(
                "x-api-key",
                header::HeaderValue::from_str(api_key).map_err(|_| {
                    GentleError::InvalidConfig("Invalid Claude API key format".to_string())
                })?,
            );
        }
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, profile })
    }
}

#[async_trait]
impl ModelAdapter for AnthropicAdapter {
    fn choice(&self) -> ModelChoice {
        ModelChoice::Creative
    }

    fn label(&self) -> &str {
        &self.profile.label
    }

    fn model(&self) -> &str {
        &self.profile.model_name
    }

    async fn complete(&self, message: &str) -> Result<Reply> {
        if self.profile.api_key.is_none() {
            return Err(GentleError::MissingApiKey {
                provider: self.profile.label.clone(),
            });
        }

        let request = AnthropicRequest {
            model: self.profile.model_name.clone(),
            max_tokens: self.profile.max_tokens,
            temperature: Some(self.profile.temperature),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: message.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.profile.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(&self.profile.label, status, &body));
        }

        let api_response: AnthropicResponse = serde_json::from_str(&body)?;
        let usage = usage_from_value(api_response.usage.as_ref());
        let content = api_response
            .content
            .into_iter()
            .find_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .ok_or_else(|| GentleError::ApiError {
                provider: self.profile.label.clone(),
                message: "No text content in response".to_string(),
            })?;

        Ok(Reply { content, usage })
    }
}

// Anthropic API types

#[derive(Debug, Clone, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    /// Thinking, tool use and any future block kinds
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}
