//! Model families, per-model parameters and the public model catalog

use serde::{Deserialize, Serialize};

use super::ProviderSettings;

/// Which external model family handles a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// Reasoning and analysis (DeepSeek)
    Reasoning,
    /// Visual, code and design work (GPT-5)
    Visual,
    /// Creative writing (Claude)
    Creative,
}

impl ModelChoice {
    /// All choices, in routing priority order
    pub const ALL: [Self; 3] = [Self::Reasoning, Self::Visual, Self::Creative];

    /// Human-readable label reported back to callers
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reasoning => "DeepSeek",
            Self::Visual => "GPT-5",
            Self::Creative => "Claude",
        }
    }

    /// Parse a caller-supplied preference, ignoring anything unrecognised
    ///
    /// Unknown strings yield `None` so the request falls through to keyword routing.
    #[must_use]
    pub fn from_preference(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|s| s.parse().ok())
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reasoning => write!(f, "reasoning"),
            Self::Visual => write!(f, "visual"),
            Self::Creative => write!(f, "creative"),
        }
    }
}

impl std::str::FromStr for ModelChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reasoning" | "deepseek" => Ok(Self::Reasoning),
            "visual" | "gpt5" | "gpt-5" => Ok(Self::Visual),
            "creative" | "claude" => Ok(Self::Creative),
            _ => Err(format!("Invalid model choice: {s}")),
        }
    }
}

/// Fixed call parameters for one provider model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Which family this profile serves
    pub choice: ModelChoice,

    /// Label used in results and error messages
    pub label: String,

    /// Actual model identifier sent to the provider
    pub model_name: String,

    /// API endpoint root, without the trailing route
    pub base_url: String,

    /// API key for authentication
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Maximum output tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,
}

impl ModelProfile {
    /// Build the profile for `choice` from provider settings
    #[must_use]
    pub fn for_choice(choice: ModelChoice, providers: &ProviderSettings) -> Self {
        let (model_name, temperature, base_url, api_key) = match choice {
            ModelChoice::Reasoning => (
                "deepseek-reasoner",
                0.7,
                &providers.deepseek_base_url,
                &providers.deepseek_api_key,
            ),
            ModelChoice::Visual => (
                "gpt-5",
                0.7,
                &providers.openai_base_url,
                &providers.openai_api_key,
            ),
            ModelChoice::Creative => (
                "claude-sonnet-4-20250514",
                1.0,
                &providers.claude_base_url,
                &providers.claude_api_key,
            ),
        };

        Self {
            choice,
            label: choice.label().to_string(),
            model_name: model_name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone().filter(|k| !k.trim().is_empty()),
            max_tokens: 5000,
            temperature,
        }
    }

    /// Check if this is a GPT-5 model
    #[must_use]
    pub fn is_gpt5_model(&self) -> bool {
        self.model_name.to_lowercase().contains("gpt-5")
    }
}

/// One entry of the public model listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_routing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
}

/// The fixed catalog of logical models exposed to clients
#[must_use]
pub fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            id: "gentle-ai".into(),
            name: "Gentle AI".into(),
            description: "Unified model combining the strengths of DeepSeek, GPT-5 and Claude"
                .into(),
            auto_routing: Some(true),
            model_type: None,
        },
        CatalogEntry {
            id: "gentle-r1".into(),
            name: "Gentle R1".into(),
            description: "Reasoning and logical analysis model (DeepSeek)".into(),
            auto_routing: None,
            model_type: Some("deepseek".into()),
        },
        CatalogEntry {
            id: "gentle-vip".into(),
            name: "Gentle VIP".into(),
            description: "High-quality creative output model (Claude)".into(),
            auto_routing: None,
            model_type: Some("claude".into()),
        },
    ]
}
