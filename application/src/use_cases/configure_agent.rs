//! Configure Agent use case.
//!
//! Admins set the assistant's model and system prompt globally or per
//! business. Every request resolves the configuration again, most specific
//! scope first, so changes apply to the next message.

use crate::ports::repository::{AgentConfigStore, RepositoryError};
use neighborly_domain::{AgentConfig, AgentScope, DomainError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigureAgentError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct ConfigureAgentUseCase {
    store: Arc<dyn AgentConfigStore>,
    default_config: AgentConfig,
}

impl ConfigureAgentUseCase {
    pub fn new(store: Arc<dyn AgentConfigStore>) -> Self {
        Self {
            store,
            default_config: AgentConfig::default(),
        }
    }

    /// Configuration used when no scope has one stored.
    pub fn with_default(mut self, config: AgentConfig) -> Self {
        self.default_config = config;
        self
    }

    pub async fn update(&self, scope: &AgentScope, config: AgentConfig) -> Result<(), ConfigureAgentError> {
        config.validate()?;
        self.store.put(scope, &config).await?;
        info!(scope = %scope, model = %config.model, "Assistant configuration updated");
        Ok(())
    }

    /// Business scope, then global scope, then the built-in default.
    pub async fn resolve(&self, scope: &AgentScope) -> Result<AgentConfig, ConfigureAgentError> {
        for candidate in scope.fallback_chain() {
            if let Some(config) = self.store.get(&candidate).await? {
                debug!(requested = %scope, resolved = %candidate, "Resolved assistant configuration");
                return Ok(config);
            }
        }
        Ok(self.default_config.clone())
    }
}
