//! Service layer for the external model providers
//!
//! Three adapters share one contract, [`ModelAdapter::invoke`]:
//! - DeepSeek (reasoning) over a plain chat-completions endpoint
//! - GPT-5 (visual/code) through a dedicated OpenAI client
//! - Claude (creative) through a dedicated Anthropic client
//!
//! Whatever goes wrong upstream, `invoke` answers with a [`DispatchResult`].

pub mod anthropic;
pub mod deepseek;
pub mod openai;

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::{ModelChoice, ModelProfile, ProviderSettings},
    error::{GentleError, Result},
};

/// Token counts (or equivalent) reported by a provider
pub type Usage = BTreeMap<String, u64>;

/// Keep the top-level integer fields of a provider usage object
#[must_use]
pub fn usage_from_value(value: Option<&serde_json::Value>) -> Usage {
    value
        .and_then(serde_json::Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(key, v)| v.as_u64().map(|n| (key.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}

/// Normalized outcome of one provider invocation
///
/// Serializes to the wire shape `{success, modelLabel, content | errorMessage, usage?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub success: bool,
    pub model_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl DispatchResult {
    /// A successful reply
    #[must_use]
    pub fn success(label: impl Into<String>, content: impl Into<String>, usage: Usage) -> Self {
        Self {
            success: true,
            model_label: label.into(),
            content: Some(content.into()),
            error_message: None,
            usage: Some(usage),
        }
    }

    /// A failed invocation
    #[must_use]
    pub fn failure(label: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            model_label: label.into(),
            content: None,
            error_message: Some(error_message.into()),
            usage: None,
        }
    }
}

/// Text and usage extracted from a successful provider response
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: String,
    pub usage: Usage,
}

/// Describe a provider failure for the caller
///
/// API errors already carry the provider name; everything else gets it prefixed.
#[must_use]
pub fn describe_failure(label: &str, error: &GentleError) -> String {
    match error {
        GentleError::ApiError { .. } => error.to_string(),
        other => format!("{label} error: {other}"),
    }
}

/// Core trait for model adapters
///
/// Implementors provide the fallible [`complete`](Self::complete); the provided
/// [`invoke`](Self::invoke) folds any failure into a [`DispatchResult`].
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Which family this adapter serves
    fn choice(&self) -> ModelChoice;

    /// Human-readable model label (e.g. "DeepSeek")
    fn label(&self) -> &str;

    /// Provider model identifier
    fn model(&self) -> &str;

    /// Send `message` as a single user turn; exactly one attempt
    async fn complete(&self, message: &str) -> Result<Reply>;

    /// Call the provider and normalize the outcome
    async fn invoke(&self, message: &str) -> DispatchResult {
        match self.complete(message).await {
            Ok(reply) => {
                tracing::debug!(
                    model = self.model(),
                    chars = reply.content.len(),
                    "provider replied"
                );
                DispatchResult::success(self.label(), reply.content, reply.usage)
            }
            Err(e) => {
                tracing::warn!(model = self.model(), error = %e, "provider call failed");
                DispatchResult::failure(self.label(), describe_failure(self.label(), &e))
            }
        }
    }
}

/// Factory for creating model adapters
pub struct ModelAdapterFactory;

impl ModelAdapterFactory {
    /// Create the adapter for a model profile
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from the profile
    pub fn create(profile: ModelProfile) -> Result<Arc<dyn ModelAdapter>> {
        let adapter: Arc<dyn ModelAdapter> = match profile.choice {
            ModelChoice::Reasoning => Arc::new(deepseek::DeepSeekAdapter::new(profile)?),
            ModelChoice::Visual => Arc::new(openai::OpenAIAdapter::new(profile)?),
            ModelChoice::Creative => Arc::new(anthropic::AnthropicAdapter::new(profile)?),
        };
        Ok(adapter)
    }

    /// Create one adapter per model family
    ///
    /// # Errors
    ///
    /// Returns an error if any adapter cannot be built
    pub fn create_all(providers: &ProviderSettings) -> Result<Vec<Arc<dyn ModelAdapter>>> {
        ModelChoice::ALL
            .into_iter()
            .map(|choice| Self::create(ModelProfile::for_choice(choice, providers)))
            .collect()
    }
}

/// Shorten an upstream error body for inclusion in a diagnostic
pub(crate) fn snippet(body: &str) -> String {
    const MAX_CHARS: usize = 200;

    let body = body.trim();
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_CHARS).collect();
        format!("{head}…")
    }
}

/// HTTP status failure, shared by all adapters
pub(crate) fn status_error(label: &str, status: reqwest::StatusCode, body: &str) -> GentleError {
    let body = snippet(body);
    GentleError::ApiError {
        provider: label.to_string(),
        message: if body.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("HTTP {}: {body}", status.as_u16())
        },
    }
}
