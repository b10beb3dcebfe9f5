//! Configuration management for Gentle
//!
//! Settings are layered, lowest priority first:
//! 1. Built-in defaults
//! 2. Config file (`~/.config/gentle/config.json` or `--config <path>`)
//! 3. Environment variables (a `.env` file in the working directory is honoured)
//! 4. CLI parameters (applied by the binary)
//!
//! The resulting [`Config`] is read once at startup and never mutated afterwards.

pub mod models;
pub mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use self::{
    models::{catalog, CatalogEntry, ModelChoice, ModelProfile},
    settings::{FileConfig, ProviderSettings, ServerSettings},
};
use crate::error::{GentleError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub providers: ProviderSettings,
    pub server: ServerSettings,
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be parsed or an
    /// environment override is malformed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is normal
        let _ = dotenv::dotenv();

        let path = path.map_or_else(Self::config_path, Path::to_path_buf);
        let file = FileConfig::load_from_path(&path)?;
        tracing::debug!(path = %path.display(), "config file resolved");

        let mut config = Self {
            providers: file.providers,
            server: file.server,
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay environment values obtained through `lookup`
    ///
    /// # Errors
    ///
    /// Returns an error if `GENTLE_PORT` is not a valid port number
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let providers = &mut self.providers;
        for (var, slot) in [
            ("OPENAI_API_KEY", &mut providers.openai_api_key),
            ("CLAUDE_API_KEY", &mut providers.claude_api_key),
            ("DEEPSEEK_API_KEY", &mut providers.deepseek_api_key),
        ] {
            if let Some(value) = lookup(var) {
                *slot = Some(value);
            }
        }

        for (var, slot) in [
            ("OPENAI_BASE_URL", &mut providers.openai_base_url),
            ("CLAUDE_BASE_URL", &mut providers.claude_base_url),
            ("DEEPSEEK_BASE_URL", &mut providers.deepseek_base_url),
            ("GENTLE_HOST", &mut self.server.host),
        ] {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }

        if let Some(port) = lookup("GENTLE_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| GentleError::InvalidConfig(format!("GENTLE_PORT={port}")))?;
        }

        Ok(())
    }

    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gentle")
    }

    /// Get the default config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }
}
