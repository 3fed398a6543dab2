//! Flow runner configuration (`[execution]` section)

use neighborly_application::ExecutionParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_tool_turns: usize,
    pub knowledge_top_k: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_tool_turns: params.max_tool_turns,
            knowledge_top_k: params.knowledge_top_k,
        }
    }
}
