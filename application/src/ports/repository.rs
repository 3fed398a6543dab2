//! Persistence ports: chat sessions and assistant configuration.

use async_trait::async_trait;
use neighborly_domain::{AgentConfig, AgentScope, ChatSession, SessionId};
use thiserror::Error;

/// Errors raised by document-backed repositories
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt document {id}: {message}")]
    Corrupt { id: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Store of chat sessions. A save replaces the whole session document.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn load(&self, id: &SessionId) -> Result<Option<ChatSession>, RepositoryError>;

    async fn save(&self, session: &ChatSession) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<ChatSession>, RepositoryError>;
}

/// Store of assistant configuration documents keyed by scope.
#[async_trait]
pub trait AgentConfigStore: Send + Sync {
    async fn get(&self, scope: &AgentScope) -> Result<Option<AgentConfig>, RepositoryError>;

    async fn put(&self, scope: &AgentScope, config: &AgentConfig) -> Result<(), RepositoryError>;
}
