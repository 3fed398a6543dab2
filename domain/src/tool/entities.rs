//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a tool does to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolEffect {
    /// Lookups and searches
    ReadOnly,
    /// Creates or changes something (e.g. a calendar event)
    Mutating,
}

impl ToolEffect {
    pub fn as_str(&self) -> &str {
        match self {
            ToolEffect::ReadOnly => "read_only",
            ToolEffect::Mutating => "mutating",
        }
    }
}

impl std::fmt::Display for ToolEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool the model backend may call mid-generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "lookup_business")
    pub name: String,
    /// Description shown to the model
    pub description: String,
    pub effect: ToolEffect,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Type hint: "string", "integer", "number", "boolean", "date", "datetime"
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, effect: ToolEffect) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            effect,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.effect == ToolEffect::ReadOnly
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// The set of tools available to flows, plus alias mappings
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
    /// Alias → canonical name mapping (e.g. "kb" → "search_knowledge_base")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Resolve a name: canonical names win over aliases
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(|s| s.as_str())
        }
    }

    /// Get tool definition by canonical name or alias
    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|canonical| self.tools.get(canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for the given names (canonical or alias), skipping unknown ones
    pub fn select<'a>(&'a self, names: &'a [String]) -> Vec<&'a ToolDefinition> {
        let mut selected: Vec<&ToolDefinition> = names
            .iter()
            .filter_map(|n| self.get_resolved(n))
            .collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name));
        selected.dedup_by(|a, b| a.name == b.name);
        selected
    }
}

/// A call to a tool requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    /// Backend-assigned id used to pair the result with the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            native_id: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_native_id(mut self, id: impl Into<String>) -> Self {
        self.native_id = Some(id.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required, non-blank string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Integer argument; models sometimes send numbers as strings or floats.
    /// Floats are truncated; floats outside the `i64` range are `None`.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
        let value = self.arguments.get(key)?;
        value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.is_finite() && *f > -LIMIT && *f < LIMIT)
                    .map(|f| f as i64)
            })
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ToolSpec {
        ToolSpec::new()
            .register(ToolDefinition::new("lookup_business", "Find a business", ToolEffect::ReadOnly))
            .register(ToolDefinition::new("create_appointment", "Book", ToolEffect::Mutating))
            .register(ToolDefinition::new("web_search", "Search the web", ToolEffect::ReadOnly))
            .register_aliases([("business", "lookup_business"), ("web", "web_search")])
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("lookup_business", "Find a business", ToolEffect::ReadOnly)
            .with_parameter(ToolParameter::new("businessId", "Place id", true));

        assert!(tool.is_read_only());
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].param_type, "string");
    }

    #[test]
    fn test_resolve_aliases() {
        let spec = spec();
        assert_eq!(spec.resolve("business"), Some("lookup_business"));
        assert_eq!(spec.resolve("web_search"), Some("web_search"));
        assert_eq!(spec.resolve("unknown"), None);
        assert_eq!(spec.get_resolved("web").unwrap().name, "web_search");
        // exact lookup ignores aliases
        assert!(spec.get("web").is_none());
    }

    #[test]
    fn test_select_sorts_dedups_and_skips_unknown() {
        let spec = spec();
        let names = vec![
            "web".to_string(),
            "lookup_business".to_string(),
            "business".to_string(),
            "missing".to_string(),
        ];
        let selected: Vec<&str> = spec.select(&names).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(selected, vec!["lookup_business", "web_search"]);
    }

    #[test]
    fn test_tool_call_arguments() {
        let call = ToolCall::new("check_availability")
            .with_arg("businessId", "abc123")
            .with_arg("durationMinutes", "30")
            .with_arg("blank", "  ")
            .with_native_id("call-1");

        assert_eq!(call.require_string("businessId").unwrap(), "abc123");
        assert!(call.require_string("blank").is_err());
        assert!(call.require_string("missing").is_err());
        assert_eq!(call.get_i64("durationMinutes"), Some(30));
        assert_eq!(call.native_id.as_deref(), Some("call-1"));
    }

    #[test]
    fn test_get_i64_conversions() {
        let call = ToolCall::new("create_appointment")
            .with_arg("float", 45.9)
            .with_arg("huge", 1e30)
            .with_arg("negative", -5)
            .with_arg("word", "abc")
            .with_arg("max", i64::MAX);

        assert_eq!(call.get_i64("float"), Some(45));
        assert_eq!(call.get_i64("huge"), None);
        assert_eq!(call.get_i64("negative"), Some(-5));
        assert_eq!(call.get_i64("word"), None);
        assert_eq!(call.get_i64("max"), Some(i64::MAX));
    }
}
