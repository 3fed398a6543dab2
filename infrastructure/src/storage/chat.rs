//! Chat sessions persisted as one document per session.

use super::document_store::JsonDocumentStore;
use async_trait::async_trait;
use neighborly_application::{ChatRepository, RepositoryError};
use neighborly_domain::{ChatSession, SessionId};

pub const CHAT_SESSIONS: &str = "chatSessions";

pub struct DocumentChatRepository {
    store: JsonDocumentStore,
}

impl DocumentChatRepository {
    pub fn new(store: JsonDocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChatRepository for DocumentChatRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<ChatSession>, RepositoryError> {
        self.store.get(CHAT_SESSIONS, id.as_str()).await
    }

    async fn save(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        self.store.put(CHAT_SESSIONS, session.id.as_str(), session).await
    }

    async fn list(&self) -> Result<Vec<ChatSession>, RepositoryError> {
        let documents = self.store.list::<ChatSession>(CHAT_SESSIONS).await?;
        Ok(documents.into_iter().map(|d| d.data).collect())
    }
}
