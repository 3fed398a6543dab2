//! Infrastructure layer for neighborly-assist
//!
//! Adapters for the ports defined in the application layer: the Gemini
//! model backend, JSON document storage, community tools, Google Calendar,
//! configuration file loading and the JSONL conversation log.

pub mod calendar;
pub mod config;
pub mod gemini;
pub mod http;
pub mod logging;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use calendar::GoogleCalendarClient;
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use gemini::GeminiGateway;
pub use http::http_client;
pub use logging::JsonlConversationLogger;
pub use storage::{
    DocumentAgentConfigStore, DocumentBusinessDirectory, DocumentCalendarAccounts,
    DocumentChatRepository, DocumentKnowledgeBase, JsonDocumentStore,
};
pub use tools::{
    CalendarTools, CommunityToolProvider, GoogleWebSearch, JsonSchemaToolConverter, ToolRegistry,
    UnsplashImageSearch,
};
