//! Assistant configuration documents, keyed by scope.

use super::document_store::JsonDocumentStore;
use async_trait::async_trait;
use neighborly_application::{AgentConfigStore, RepositoryError};
use neighborly_domain::{AgentConfig, AgentScope};

pub const AGENT_CONFIGS: &str = "agentConfigs";

pub struct DocumentAgentConfigStore {
    store: JsonDocumentStore,
}

impl DocumentAgentConfigStore {
    pub fn new(store: JsonDocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AgentConfigStore for DocumentAgentConfigStore {
    async fn get(&self, scope: &AgentScope) -> Result<Option<AgentConfig>, RepositoryError> {
        self.store.get(AGENT_CONFIGS, &scope.key()).await
    }

    async fn put(&self, scope: &AgentScope, config: &AgentConfig) -> Result<(), RepositoryError> {
        self.store.put(AGENT_CONFIGS, &scope.key(), config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighborly_domain::Model;

    #[tokio::test]
    async fn test_scoped_configs_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentAgentConfigStore::new(JsonDocumentStore::new(dir.path()));
        let bakery = AgentScope::Business("abc123".to_string());

        store
            .put(&AgentScope::Global, &AgentConfig::new(Model::Gemini20Flash, "Be helpful."))
            .await
            .unwrap();
        store
            .put(&bakery, &AgentConfig::new(Model::Gemini25Pro, "You answer for the bakery."))
            .await
            .unwrap();

        let global = store.get(&AgentScope::Global).await.unwrap().unwrap();
        assert_eq!(global.model, Model::Gemini20Flash);
        let scoped = store.get(&bakery).await.unwrap().unwrap();
        assert_eq!(scoped.system_prompt, "You answer for the bakery.");
        assert!(store.get(&AgentScope::Business("other".to_string())).await.unwrap().is_none());
    }
}
