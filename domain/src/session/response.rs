//! Structured model responses.
//!
//! A response is a list of content blocks mixing text and function calls,
//! plus the token usage the backend reported for that call.
//!
//! ```
//! use neighborly_domain::session::response::{ContentBlock, LlmResponse, StopReason};
//!
//! let response = LlmResponse {
//!     content: vec![ContentBlock::ToolUse {
//!         id: "call-0".to_string(),
//!         name: "lookup_business".to_string(),
//!         input: [("businessId".to_string(), serde_json::json!("abc123"))]
//!             .into_iter()
//!             .collect(),
//!     }],
//!     stop_reason: Some(StopReason::ToolUse),
//!     model: None,
//!     usage: None,
//! };
//! assert_eq!(response.tool_calls()[0].get_string("businessId"), Some("abc123"));
//! ```

use crate::chat::usage::TokenUsage;
use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content in a conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(String),

    /// A function call requested by the model.
    ToolUse {
        /// Id pairing the call with its result. Synthesized when the
        /// backend does not assign one.
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },

    /// The outcome of a [`ContentBlock::ToolUse`], sent back to the model.
    ToolResult {
        id: String,
        name: String,
        output: serde_json::Value,
    },
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<(&str, &str, &HashMap<String, serde_json::Value>)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// The model wants tool results before it continues.
    ToolUse,
    MaxTokens,
    /// Blocked by the backend's safety filters.
    Safety,
    Other(String),
}

/// A structured response from the model backend.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    /// Model version reported by the backend.
    pub model: Option<String>,
    /// Token usage for this single call.
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Concatenate all text blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Function calls as [`ToolCall`]s carrying their pairing id.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    tool_name: name.clone(),
                    arguments: input.clone(),
                    native_id: Some(id.clone()),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// Usage for this call, zero when the backend reported none.
    pub fn usage_or_default(&self) -> TokenUsage {
        self.usage.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_creates_text_only_response() {
        let response = LlmResponse::from_text("{\"reply\":\"hi\"}");
        assert_eq!(response.text_content(), "{\"reply\":\"hi\"}");
        assert!(!response.has_tool_calls());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert!(response.usage.is_none());
        assert!(response.usage_or_default().is_zero());
    }

    #[test]
    fn tool_calls_keep_ids_and_arguments() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::Text("Checking.".to_string()),
                ContentBlock::ToolUse {
                    id: "call-0".to_string(),
                    name: "check_availability".to_string(),
                    input: [
                        ("businessId".to_string(), serde_json::json!("abc")),
                        ("date".to_string(), serde_json::json!("2026-03-02")),
                    ]
                    .into_iter()
                    .collect(),
                },
                ContentBlock::ToolUse {
                    id: "call-1".to_string(),
                    name: "web_search".to_string(),
                    input: [("query".to_string(), serde_json::json!("farmers market"))]
                        .into_iter()
                        .collect(),
                },
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: Some("gemini-2.0-flash".to_string()),
            usage: Some(TokenUsage::new(120, 14)),
        };

        assert!(response.has_tool_calls());
        assert_eq!(response.text_content(), "Checking.");
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].native_id.as_deref(), Some("call-0"));
        assert_eq!(calls[0].get_string("date"), Some("2026-03-02"));
        assert_eq!(calls[1].tool_name, "web_search");
        assert_eq!(response.usage_or_default().total_tokens, 134);
    }

    #[test]
    fn tool_result_block_is_not_text() {
        let block = ContentBlock::ToolResult {
            id: "call-0".to_string(),
            name: "web_search".to_string(),
            output: serde_json::json!({"results": []}),
        };
        assert!(block.as_text().is_none());
        assert!(block.as_tool_use().is_none());
    }
}
