//! Tool call validation
//!
//! Pure checks of a [`ToolCall`] against its [`ToolDefinition`], run before
//! a call is dispatched to a provider.

use super::entities::{ToolCall, ToolDefinition};

pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Checks required parameters, unknown parameters, and basic types
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None if param.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                None => {}
                Some(value) => {
                    let ok = match param.param_type.as_str() {
                        "integer" => call.get_i64(&param.name).is_some(),
                        "number" => value.is_number() || value.as_str().is_some_and(|s| s.parse::<f64>().is_ok()),
                        "boolean" => value.is_boolean(),
                        _ => value.is_string(),
                    };
                    if !ok {
                        return Err(format!(
                            "Parameter '{}' for tool '{}' must be of type {}",
                            param.name, definition.name, param.param_type
                        ));
                    }
                }
            }
        }

        for arg_name in call.arguments.keys() {
            if !definition.parameters.iter().any(|p| &p.name == arg_name) {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}
