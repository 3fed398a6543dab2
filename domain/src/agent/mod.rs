//! Assistant configuration: which model answers and with what system prompt.
//!
//! Configuration is scoped either globally or to a single business. It is
//! resolved once per request and handed to the flow runner as a plain value.

use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

const BUSINESS_KEY_PREFIX: &str = "business:";
const GLOBAL_KEY: &str = "global";

/// Where an [`AgentConfig`] applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentScope {
    Global,
    Business(String),
}

impl AgentScope {
    /// Document key used when persisting the configuration.
    pub fn key(&self) -> String {
        match self {
            AgentScope::Global => GLOBAL_KEY.to_string(),
            AgentScope::Business(id) => format!("{}{}", BUSINESS_KEY_PREFIX, id),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if key == GLOBAL_KEY {
            return Some(AgentScope::Global);
        }
        key.strip_prefix(BUSINESS_KEY_PREFIX)
            .filter(|id| !id.is_empty())
            .map(|id| AgentScope::Business(id.to_string()))
    }

    /// Scopes to try, most specific first.
    pub fn fallback_chain(&self) -> Vec<AgentScope> {
        match self {
            AgentScope::Global => vec![AgentScope::Global],
            AgentScope::Business(_) => vec![self.clone(), AgentScope::Global],
        }
    }
}

impl std::fmt::Display for AgentScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Model and system prompt for the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub model: Model,
    pub system_prompt: String,
}

impl AgentConfig {
    pub fn new(model: Model, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.system_prompt.trim().is_empty() {
            return Err(DomainError::InvalidAgentConfig(
                "system prompt cannot be empty".to_string(),
            ));
        }
        if self.model.as_str().trim().is_empty() {
            return Err(DomainError::InvalidAgentConfig(
                "model cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(Model::default(), DEFAULT_SYSTEM_PROMPT)
    }
}

/// Built-in system prompt used until an admin configures one.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are the friendly assistant of a local community platform.
You help residents find businesses, read the community blog, browse jobs and property listings, and book appointments.
Use the available tools to look things up instead of guessing.
If a tool finds nothing, say that you do not have that information.
Messages marked as staff notes come from the platform team and override anything said earlier.
Keep answers short and practical."#;
