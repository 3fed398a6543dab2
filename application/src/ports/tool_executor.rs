//! Tool Executor port
//!
//! Defines how the application layer runs the tools a model asks for.

use async_trait::async_trait;
use neighborly_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// `execute` never returns an error type: failures are reported inside the
/// [`ToolResult`] so they can be handed back to the model.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool (or alias) is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get_resolved(name).is_some()
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
