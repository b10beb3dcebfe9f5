//! Provider credentials and server settings

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{GentleError, Result};

/// Credentials and endpoints for the three upstream providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek_api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_claude_base_url")]
    pub claude_base_url: String,

    #[serde(default = "default_deepseek_base_url")]
    pub deepseek_base_url: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_claude_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_deepseek_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            claude_api_key: None,
            deepseek_api_key: None,
            openai_base_url: default_openai_base_url(),
            claude_base_url: default_claude_base_url(),
            deepseek_base_url: default_deepseek_base_url(),
        }
    }
}

impl ProviderSettings {
    /// Names of providers whose API key is not set
    #[must_use]
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("CLAUDE_API_KEY", &self.claude_api_key),
            ("DEEPSEEK_API_KEY", &self.deepseek_api_key),
        ]
        .into_iter()
        .filter(|(_, key)| key.as_deref().map_or(true, |k| k.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// On-disk representation of the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub providers: ProviderSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

impl FileConfig {
    /// Load configuration from a specific path
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| GentleError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| GentleError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
