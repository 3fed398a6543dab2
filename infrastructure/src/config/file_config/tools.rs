//! Third-party tool credentials (`[tools]` section)

use super::gemini::resolve_secret;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub web_search: FileWebSearchConfig,
    pub image_search: FileImageSearchConfig,
}

/// Google Custom Search JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWebSearchConfig {
    pub api_key_env: String,
    pub api_key: Option<String>,
    /// Programmable search engine id (`cx`).
    pub engine_id: Option<String>,
    pub base_url: String,
}

impl Default for FileWebSearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_SEARCH_API_KEY".to_string(),
            api_key: None,
            engine_id: None,
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
        }
    }
}

impl FileWebSearchConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Unsplash photo search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileImageSearchConfig {
    pub access_key_env: String,
    pub access_key: Option<String>,
    pub base_url: String,
}

impl Default for FileImageSearchConfig {
    fn default() -> Self {
        Self {
            access_key_env: "UNSPLASH_ACCESS_KEY".to_string(),
            access_key: None,
            base_url: "https://api.unsplash.com".to_string(),
        }
    }
}

impl FileImageSearchConfig {
    pub fn resolve_access_key(&self) -> Option<String> {
        resolve_secret(self.access_key.as_deref(), &self.access_key_env)
    }
}
