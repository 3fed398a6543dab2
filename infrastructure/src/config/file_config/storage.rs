//! Storage and logging locations (`[storage]`, `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Document store root. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("neighborly")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving conversation events.
    pub conversation_log: Option<PathBuf>,
    /// Directory for the daily rolling diagnostic log.
    pub log_dir: Option<PathBuf>,
}
