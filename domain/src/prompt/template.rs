//! Prompt fragments shared by the flow runner and the chat service.

use crate::chat::entities::{ChatMessage, Role};
use crate::session::entities::Message;

const STAFF_NOTE_PREFIX: &str = "[Staff note, authoritative]";

/// Templates for model-facing text
pub struct PromptTemplate;

impl PromptTemplate {
    /// Wrap an admin message so the model treats it as an instruction from staff.
    pub fn staff_note(text: &str) -> String {
        format!(
            "{} {}\n(Follow this note when it conflicts with earlier messages.)",
            STAFF_NOTE_PREFIX,
            text.trim()
        )
    }

    /// Convert a stored conversation into model turns.
    pub fn history_turns(history: &[ChatMessage]) -> Vec<Message> {
        history
            .iter()
            .map(|m| match m.role {
                Role::User => Message::user(m.text.clone()),
                Role::Model => Message::model(m.text.clone()),
                Role::Admin => Message::user(Self::staff_note(&m.text)),
            })
            .collect()
    }

    /// Instruction used when a structured response schema cannot be enforced
    /// by the backend (tool-calling requests).
    pub fn json_output_instruction(schema: &serde_json::Value) -> String {
        format!(
            r#"When you have your final answer, respond with a single JSON object and nothing else.
The object must match this JSON schema:
{}"#,
            serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string())
        )
    }
}
