//! Default assistant configuration (`[agent]` section)
//!
//! Used when no global or business configuration has been stored.

use neighborly_domain::{AgentConfig, DEFAULT_SYSTEM_PROMPT, Model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub model: String,
    /// Overrides the built-in system prompt.
    pub system_prompt: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            model: Model::default().to_string(),
            system_prompt: None,
        }
    }
}

impl FileAgentConfig {
    pub fn to_agent_config(&self) -> AgentConfig {
        AgentConfig::new(
            Model::from(self.model.trim()),
            self.system_prompt
                .clone()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        )
    }
}
