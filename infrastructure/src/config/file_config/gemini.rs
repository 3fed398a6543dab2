//! Model backend configuration (`[gemini]` section)

use crate::gemini::adapter::{DEFAULT_BASE_URL, DEFAULT_EMBEDDING_MODEL};
use serde::{Deserialize, Serialize};

/// Google Generative Language API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable holding the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key; prefer the environment variable.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Model used by `embedContent`.
    pub embedding_model: String,
    /// HTTP timeout for every outbound call.
    pub timeout_seconds: u64,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl FileGeminiConfig {
    /// API key from the config file, else from `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_deref(), &self.api_key_env)
    }
}

pub(crate) fn resolve_secret(direct: Option<&str>, env_var: &str) -> Option<String> {
    direct
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|k| !k.trim().is_empty())
}
