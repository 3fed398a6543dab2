//! Tool domain value objects: result and error types.
//!
//! Tools degrade to negative values instead of failing, so a
//! [`ToolResult`] failure is reserved for calls the tool could not even
//! interpret (bad arguments, unknown tool).

use serde::{Deserialize, Serialize};

/// Error that occurred while dispatching a tool call.
///
/// | Code | Meaning |
/// |------|---------|
/// | `INVALID_ARGUMENT` | Missing or malformed parameters |
/// | `NOT_FOUND` | Unknown tool |
/// | `EXECUTION_FAILED` | The tool could not produce any output |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Tool not found: {}", resource.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying structured output or an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Execution metadata used for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// For search tools: number of results returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    /// True when the tool fell back to its negative shape
    #[serde(default)]
    pub degraded: bool,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Serialize a typed tool outcome into a successful result.
    pub fn from_outcome<T: Serialize>(tool_name: impl Into<String>, outcome: &T) -> Self {
        let tool_name = tool_name.into();
        match serde_json::to_value(outcome) {
            Ok(output) => Self::success(tool_name, output),
            Err(e) => Self::failure(
                tool_name,
                ToolError::execution_failed(format!("Failed to serialize tool output: {}", e)),
            ),
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_result_count(mut self, count: usize) -> Self {
        self.metadata.result_count = Some(count);
        self
    }

    pub fn degraded(mut self, degraded: bool) -> Self {
        self.metadata.degraded = degraded;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&serde_json::Value> {
        self.output.as_ref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Payload handed back to the model: the output, or `{"error": ...}`.
    pub fn to_model_payload(&self) -> serde_json::Value {
        match (&self.output, &self.error) {
            (Some(output), _) => output.clone(),
            (None, Some(error)) => serde_json::json!({ "error": error.message }),
            (None, None) => serde_json::json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Slots {
        available: Vec<&'static str>,
    }

    #[test]
    fn test_from_outcome() {
        let result = ToolResult::from_outcome("check_availability", &Slots { available: vec!["09:00"] })
            .with_duration(12)
            .with_result_count(1);

        assert!(result.is_success());
        assert_eq!(result.output().unwrap()["available"][0], "09:00");
        assert_eq!(result.metadata.duration_ms, Some(12));
        assert!(!result.metadata.degraded);
    }

    #[test]
    fn test_failure_payload() {
        let result = ToolResult::failure(
            "lookup_business",
            ToolError::invalid_argument("Missing required argument: businessId"),
        );

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert_eq!(
            result.to_model_payload(),
            serde_json::json!({"error": "Missing required argument: businessId"})
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ToolError::not_found("teleport").to_string(),
            "[NOT_FOUND] Tool not found: teleport"
        );
    }
}
