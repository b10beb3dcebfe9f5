//! OpenAI API adapter (GPT-5, visual and code requests)
//!
//! Also hosts the chat-completions wire types shared with the DeepSeek adapter.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ModelChoice, ModelProfile},
    error::{GentleError, Result},
};

use super::{status_error, usage_from_value, ModelAdapter, Reply};

/// OpenAI API adapter
pub struct OpenAIAdapter {
    client: Client,
    profile: ModelProfile,
}

impl OpenAIAdapter {
    /// Create a new OpenAI adapter
    ///
    /// The bearer token is baked into the client's default headers. Without a
    /// key the adapter still builds, but every call fails with
    /// [`GentleError::MissingApiKey`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the client
    /// cannot be built
    pub fn new(profile: ModelProfile) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(api_key) = &profile.api_key {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
                    GentleError::InvalidConfig("Invalid OpenAI API key format".to_string())
                })?,
            );
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, profile })
    }

    fn build_request(&self, message: &str) -> ChatCompletionRequest {
        // GPT-5 rejects `max_tokens` in favour of `max_completion_tokens` and
        // only accepts its default temperature
        let (max_tokens, max_completion_tokens, temperature) = if self.profile.is_gpt5_model() {
            (None, Some(self.profile.max_tokens), None)
        } else {
            (Some(self.profile.max_tokens), None, Some(self.profile.temperature))
        };

        ChatCompletionRequest {
            model: self.profile.model_name.clone(),
            messages: vec![ChatMessage::user(message)],
            max_tokens,
            max_completion_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl ModelAdapter for OpenAIAdapter {
    fn choice(&self) -> ModelChoice {
        ModelChoice::Visual
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

        let response = self
            .client
            .post(format!("{}/chat/completions", self.profile.base_url))
            .json(&self.build_request(message))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(&self.profile.label, status, &body));
        }

        serde_json::from_str::<ChatCompletionResponse>(&body)?.into_reply(&self.profile.label)
    }
}

// Chat-completions wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatCompletionResponse {
    /// First choice's text, or an API error naming `label`
    pub fn into_reply(self, label: &str) -> Result<Reply> {
        let usage = usage_from_value(self.usage.as_ref());
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GentleError::ApiError {
                provider: label.to_string(),
                message: "No choices in response".to_string(),
            })?;

        Ok(Reply { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::config::ProviderSettings;

    fn adapter_for(server: &MockServer, api_key: Option<&str>) -> OpenAIAdapter {
        let providers = ProviderSettings {
            openai_api_key: api_key.map(String::from),
            openai_base_url: format!("{}/v1", server.uri()),
            ..ProviderSettings::default()
        };
        OpenAIAdapter::new(ModelProfile::for_choice(ModelChoice::Visual, &providers)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-5",
                "max_completion_tokens": 5000,
                "messages": [{"role": "user", "content": "build a website"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": "gpt-5",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "<html></html>"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 4, "completion_tokens": 6, "total_tokens": 10}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = adapter_for(&server, Some("sk-test")).invoke("build a website").await;

        assert!(result.success);
        assert_eq!(result.model_label, "GPT-5");
        assert_eq!(result.content.as_deref(), Some("<html></html>"));
        assert_eq!(result.usage.unwrap().get("total_tokens"), Some(&10));
    }

    #[tokio::test]
    async fn test_server_error_is_soft_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&server)
            .await;

        let result = adapter_for(&server, Some("sk-test")).invoke("draw a cat").await;

        assert!(!result.success);
        assert!(result.content.is_none());
        let error = result.error_message.unwrap();
        assert!(error.contains("GPT-5"));
        assert!(error.contains("500"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_soft_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let result = adapter_for(&server, Some("sk-test")).invoke("code a game").await;
        assert_eq!(
            result.error_message.as_deref(),
            Some("GPT-5 API error: No choices in response")
        );
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = adapter_for(&server, None).invoke("design a logo").await;
        assert!(!result.success);
        assert_eq!(
            result.error_message.as_deref(),
            Some("GPT-5 error: missing API key for GPT-5")
        );
    }

    #[test]
    fn test_non_gpt5_model_uses_max_tokens() {
        let mut profile = ModelProfile::for_choice(ModelChoice::Visual, &ProviderSettings::default());
        profile.model_name = "gpt-4o".into();
        let adapter = OpenAIAdapter::new(profile).unwrap();

        let request = serde_json::to_value(adapter.build_request("hi")).unwrap();
        assert_eq!(request["max_tokens"], json!(5000));
        assert_eq!(request["temperature"], json!(0.7));
        assert!(request.get("max_completion_tokens").is_none());
    }

    #[test]
    fn test_gpt5_request_omits_temperature() {
        let profile = ModelProfile::for_choice(ModelChoice::Visual, &ProviderSettings::default());
        let adapter = OpenAIAdapter::new(profile).unwrap();

        let request = serde_json::to_value(adapter.build_request("hi")).unwrap();
        assert_eq!(request["max_completion_tokens"], json!(5000));
        assert!(request.get("temperature").is_none());
        assert!(request.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_soft_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let result = adapter_for(&server, Some("sk-test")).invoke("draw a chart").await;
        assert!(!result.success);
        assert!(result
            .error_message
            .unwrap()
            .starts_with("GPT-5 error: JSON error"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_soft_failure() {
        let providers = ProviderSettings {
            openai_api_key: Some("sk-test".into()),
            openai_base_url: "http://127.0.0.1:1".into(),
            ..ProviderSettings::default()
        };
        let adapter =
            OpenAIAdapter::new(ModelProfile::for_choice(ModelChoice::Visual, &providers)).unwrap();

        let result = adapter.invoke("ui mockup").await;
        assert!(!result.success);
        assert!(result.error_message.unwrap().starts_with("GPT-5 error: HTTP error"));
    }
}
