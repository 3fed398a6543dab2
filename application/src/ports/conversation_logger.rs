//! Port for machine-readable conversation logging.
//!
//! Diagnostic output goes through `tracing`. This port records the events a
//! platform operator wants to replay or bill from (`flow_completed`,
//! `tool_call`, `chat_message`), one record per event.

use serde_json::Value;

/// A structured event: a type tag and a JSON payload.
pub struct ConversationEvent {
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible; a failed write must never abort a
/// request.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Logger that drops everything.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
