//! Function declarations for tool definitions.
//!
//! Default implementation of [`ToolSchemaPort`]. Declarations use the
//! `{name, description, parameters}` layout that generative backends accept
//! for function calling.

use neighborly_application::ToolSchemaPort;
use neighborly_domain::tool::entities::ToolDefinition;
use serde_json::{Map, Value, json};

/// Produces JSON Schema function declarations.
///
/// `param_type` mapping:
/// - `"number"`, `"integer"`, `"boolean"` → same
/// - `"date"` → `"string"` (YYYY-MM-DD)
/// - `"datetime"` → `"string"` (RFC 3339)
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

fn format_hint(param_type: &str) -> Option<&'static str> {
    match param_type {
        "date" => Some("YYYY-MM-DD"),
        "datetime" => Some("RFC 3339 date-time, e.g. 2024-05-14T10:00:00-05:00"),
        _ => None,
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };
            let description = match format_hint(&param.param_type) {
                Some(hint) => format!("{} ({})", param.description, hint),
                None => param.description.clone(),
            };

            properties.insert(
                param.name.clone(),
                json!({ "type": schema_type, "description": description }),
            );
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighborly_domain::tool::entities::{ToolEffect, ToolParameter, ToolSpec};

    fn availability_tool() -> ToolDefinition {
        ToolDefinition::new("check_availability", "Free slots", ToolEffect::ReadOnly)
            .with_parameter(ToolParameter::new("businessId", "Business place id", true))
            .with_parameter(ToolParameter::new("date", "Day to check", true).with_type("date"))
            .with_parameter(ToolParameter::new("limit", "Max slots", false).with_type("integer"))
    }

    #[test]
    fn test_tool_to_schema() {
        let schema = JsonSchemaToolConverter.tool_to_schema(&availability_tool());

        assert_eq!(schema["name"], "check_availability");
        assert_eq!(schema["parameters"]["type"], "object");

        let date = &schema["parameters"]["properties"]["date"];
        assert_eq!(date["type"], "string");
        assert_eq!(date["description"], "Day to check (YYYY-MM-DD)");
        assert_eq!(schema["parameters"]["properties"]["limit"]["type"], "integer");

        let required = schema["parameters"]["required"].as_array().unwrap();
        assert_eq!(required, &vec![json!("businessId"), json!("date")]);
    }

    #[test]
    fn test_selected_tools_schema_resolves_aliases() {
        let spec = ToolSpec::new()
            .register(availability_tool())
            .register(ToolDefinition::new("web_search", "Search", ToolEffect::ReadOnly))
            .register_alias("availability", "check_availability");

        let names = vec!["availability".to_string(), "missing".to_string()];
        let tools = JsonSchemaToolConverter.selected_tools_schema(&spec, &names);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "check_availability");

        let all = JsonSchemaToolConverter.all_tools_schema(&spec);
        assert_eq!(all[0]["name"], "check_availability");
        assert_eq!(all[1]["name"], "web_search");
    }
}
