use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{defaults, gemini};
use crate::context::ConversationStore;
use crate::error::GlossaError;
use crate::llm::GeminiClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub history_path: PathBuf,
    pub timeout_secs: u64,
    pub system_instruction: String,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::BASE_URL.to_string(),
            api_key_env: gemini::API_KEY_ENV.to_string(),
            history_path: PathBuf::from(defaults::HISTORY_FILE),
            timeout_secs: defaults::TIMEOUT_SECS,
            system_instruction: defaults::SYSTEM_INSTRUCTION.to_string(),
            theme: defaults::THEME.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glossa")
            .join("config.toml")
    }

    /// Load from the default config path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing or unparsable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), GlossaError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GlossaError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GlossaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable named in settings.
    pub fn api_key(&self) -> Result<String, GlossaError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GlossaError::Config(format!(
                "{} environment variable is not set",
                self.api_key_env
            ))),
        }
    }

    /// Request timeout. Zero means the default, not an instant failure.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(defaults::TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Build the Gemini client. Fails when the API key is missing.
    pub fn build_client(&self) -> Result<GeminiClient, GlossaError> {
        let api_key = self.api_key()?;
        GeminiClient::new(api_key)
            .with_model(&self.model)
            .with_base_url(&self.base_url)
            .with_timeout(self.timeout())
    }

    pub fn build_store(&self) -> ConversationStore {
        ConversationStore::new(&self.history_path)
    }
}
