//! Document storage and the repository adapters built on it.

pub mod agent_config;
pub mod calendar_accounts;
pub mod chat;
pub mod directory;
pub mod document_store;

pub use agent_config::DocumentAgentConfigStore;
pub use calendar_accounts::DocumentCalendarAccounts;
pub use chat::DocumentChatRepository;
pub use directory::{DocumentBusinessDirectory, DocumentKnowledgeBase};
pub use document_store::{Document, JsonDocumentStore};
