//! Tool schema conversion port.
//!
//! The domain decides which tools a flow may use; this port decides how a
//! [`ToolDefinition`] is serialized as a function declaration.

use neighborly_domain::tool::entities::{ToolDefinition, ToolSpec};

pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a function declaration.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// All tools (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        let mut tools: Vec<_> = spec.all().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }

    /// The named tools only (sorted, unknown names skipped).
    fn selected_tools_schema(&self, spec: &ToolSpec, names: &[String]) -> Vec<serde_json::Value> {
        spec.select(names)
            .into_iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }
}
