//! One request round-trip: validate, route, invoke

use std::sync::Arc;

use crate::{
    config::{ModelChoice, ProviderSettings},
    error::{GentleError, Result},
    router,
    services::{DispatchResult, ModelAdapter, ModelAdapterFactory},
};

/// Trim `raw` and reject it if nothing is left
///
/// # Errors
///
/// Returns [`GentleError::InvalidInput`] for empty or whitespace-only messages
pub fn validate_message(raw: &str) -> Result<&str> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(GentleError::InvalidInput("Message content is required".into()));
    }
    Ok(message)
}

/// Routes each message to exactly one adapter
#[derive(Clone, Default)]
pub struct Coordinator {
    adapters: Vec<Arc<dyn ModelAdapter>>,
}

impl Coordinator {
    /// A coordinator with no adapters registered
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the three provider adapters from settings
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter's HTTP client cannot be built
    pub fn from_settings(providers: &ProviderSettings) -> Result<Self> {
        Ok(Self {
            adapters: ModelAdapterFactory::create_all(providers)?,
        })
    }

    /// Register `adapter`, replacing any adapter for the same choice
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn ModelAdapter>) -> Self {
        self.adapters.retain(|a| a.choice() != adapter.choice());
        self.adapters.push(adapter);
        self
    }

    /// Adapter serving `choice`, if registered
    #[must_use]
    pub fn adapter(&self, choice: ModelChoice) -> Option<&Arc<dyn ModelAdapter>> {
        self.adapters.iter().find(|a| a.choice() == choice)
    }

    /// Route `message` and return the chosen adapter's result unchanged
    ///
    /// Never fails: provider problems come back as `success: false`. The
    /// message is expected to have passed [`validate_message`] already.
    pub async fn process_request(
        &self,
        message: &str,
        preference: Option<ModelChoice>,
    ) -> DispatchResult {
        let decision = router::explain(message, preference);
        tracing::debug!(choice = %decision.choice, reason = ?decision.reason, "model selected");

        match self.adapter(decision.choice) {
            Some(adapter) => {
                tracing::info!(choice = %decision.choice, model = adapter.model(), "dispatching");
                adapter.invoke(message).await
            }
            None => {
                let err = GentleError::UnknownModel(decision.choice.to_string());
                tracing::error!(choice = %decision.choice, "no adapter registered");
                DispatchResult::failure(decision.choice.label(), err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field(
                "adapters",
                &self.adapters.iter().map(|a| a.model()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::ScriptedAdapter;

    struct Fixture {
        reasoning: Arc<ScriptedAdapter>,
        visual: Arc<ScriptedAdapter>,
        creative: Arc<ScriptedAdapter>,
        coordinator: Coordinator,
    }

    fn fixture() -> Fixture {
        let reasoning = Arc::new(ScriptedAdapter::replying(ModelChoice::Reasoning, "reasoned"));
        let visual = Arc::new(ScriptedAdapter::failing(ModelChoice::Visual, "HTTP 500"));
        let creative = Arc::new(ScriptedAdapter::replying(ModelChoice::Creative, "a poem"));
        let coordinator = Coordinator::new()
            .with_adapter(reasoning.clone())
            .with_adapter(visual.clone())
            .with_adapter(creative.clone());
        Fixture {
            reasoning,
            visual,
            creative,
            coordinator,
        }
    }

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message("  hi \n").unwrap(), "hi");
        assert!(matches!(
            validate_message(" \t\n"),
            Err(GentleError::InvalidInput(_))
        ));
        assert!(validate_message("").is_err());
    }

    #[tokio::test]
    async fn test_invokes_exactly_one_adapter() {
        let f = fixture();
        let result = f
            .coordinator
            .process_request("write a poem about the sea", None)
            .await;

        assert!(result.success);
        assert_eq!(result.model_label, "Claude");
        assert_eq!(result.content.as_deref(), Some("a poem"));
        assert_eq!(f.creative.calls(), 1);
        assert_eq!(f.reasoning.calls(), 0);
        assert_eq!(f.visual.calls(), 0);
    }

    #[tokio::test]
    async fn test_preference_routes_to_chosen_adapter() {
        let f = fixture();
        let result = f
            .coordinator
            .process_request("write a poem", Some(ModelChoice::Reasoning))
            .await;

        assert_eq!(result.content.as_deref(), Some("reasoned"));
        assert_eq!(f.reasoning.calls(), 1);
        assert_eq!(f.creative.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_returned_without_fallback() {
        let f = fixture();
        let result = f
            .coordinator
            .process_request("build a website in html and css", None)
            .await;

        assert!(!result.success);
        assert!(result.content.is_none());
        assert_eq!(result.error_message.as_deref(), Some("GPT-5 API error: HTTP 500"));
        assert_eq!(f.visual.calls(), 1);
        assert_eq!(f.reasoning.calls() + f.creative.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_adapter_is_unknown_model() {
        let reasoning = Arc::new(ScriptedAdapter::replying(ModelChoice::Reasoning, "ok"));
        let coordinator = Coordinator::new().with_adapter(reasoning.clone());

        let result = coordinator.process_request("draw a cat", None).await;

        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some("Unknown model: visual"));
        assert_eq!(reasoning.calls(), 0);
    }

    #[test]
    fn test_with_adapter_replaces_same_choice() {
        let coordinator = Coordinator::new()
            .with_adapter(Arc::new(ScriptedAdapter::replying(ModelChoice::Creative, "a")))
            .with_adapter(Arc::new(ScriptedAdapter::replying(ModelChoice::Creative, "b")));
        assert_eq!(coordinator.adapters.len(), 1);
        assert!(coordinator.adapter(ModelChoice::Visual).is_none());
    }

    #[tokio::test]
    async fn test_real_adapters_without_keys_fail_soft() {
        let coordinator = Coordinator::from_settings(&ProviderSettings::default()).unwrap();
        for message in ["analyze this", "draw a cat", "write a story"] {
            let result = coordinator.process_request(message, None).await;
            assert!(!result.success);
            assert!(result.error_message.unwrap().contains("missing API key"));
        }
    }
}
