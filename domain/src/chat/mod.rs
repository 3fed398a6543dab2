//! Chat domain: sessions, messages, and token accounting.
//!
//! A [`ChatSession`](entities::ChatSession) is an append-only log of
//! [`ChatMessage`](entities::ChatMessage)s. Model replies carry a
//! [`UsageRecord`](usage::UsageRecord) which the session folds into its
//! running [`SessionTotals`](usage::SessionTotals).

pub mod entities;
pub mod usage;

pub use entities::{ChatMessage, ChatSession, MessageId, Participant, Role, SessionId};
pub use usage::{SessionTotals, TokenUsage, UsageRecord};
