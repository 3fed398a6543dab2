//! Conversation turns sent to the model backend.

use super::response::{ContentBlock, LlmResponse};
use serde::{Deserialize, Serialize};

/// Author of a turn as the model backend sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
    /// Function results returned to the model.
    Tool,
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: TurnRole,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// The model's own turn, replayed verbatim so function calls stay paired.
    pub fn from_response(response: &LlmResponse) -> Self {
        Self {
            role: TurnRole::Model,
            content: response.content.clone(),
        }
    }

    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: TurnRole::Tool,
            content: results,
        }
    }

    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }
}
