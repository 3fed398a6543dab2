//! Conversation event logging.
//!
//! [`JsonlConversationLogger`] implements the
//! [`ConversationLogger`](neighborly_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
