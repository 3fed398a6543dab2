//! Execution parameters: flow runner and tool loop control.
//!
//! These are application-layer concerns, not domain policy. The binary
//! builds them from the `[execution]` config section.

use serde::{Deserialize, Serialize};

/// Tool loop and retrieval parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum tool-use rounds in a single flow run.
    pub max_tool_turns: usize,
    /// Number of knowledge-base chunks returned by a search.
    pub knowledge_top_k: usize,
    /// Default appointment length when the model omits one.
    pub default_appointment_minutes: i64,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_turns: 5,
            knowledge_top_k: 3,
            default_appointment_minutes: 60,
        }
    }
}

impl ExecutionParams {
    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = max;
        self
    }

    pub fn with_knowledge_top_k(mut self, k: usize) -> Self {
        self.knowledge_top_k = k;
        self
    }

    pub fn with_default_appointment_minutes(mut self, minutes: i64) -> Self {
        self.default_appointment_minutes = minutes;
        self
    }
}
