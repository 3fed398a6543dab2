//! Flow definitions: a prompt template bound to typed input and output.

use super::schema::{Schema, ValidationError};
use crate::core::model::Model;
use minijinja::Environment;
use serde_json::Value;

/// A named, schema-typed unit of generation work.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub name: String,
    pub description: String,
    pub input: Schema,
    pub output: Schema,
    /// Template text; input fields are available as variables.
    pub prompt: String,
    /// Flow-specific instruction appended after the agent's system prompt.
    pub system: Option<String>,
    /// Tool names this flow may call.
    pub tools: Vec<String>,
    /// Overrides the agent's model when set.
    pub model: Option<Model>,
}

impl FlowDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input: Schema::new(),
            output: Schema::new(),
            prompt: prompt.into(),
            system: None,
            tools: Vec::new(),
            model: None,
        }
    }

    pub fn with_input(mut self, schema: Schema) -> Self {
        self.input = schema;
        self
    }

    pub fn with_output(mut self, schema: Schema) -> Self {
        self.output = schema;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn uses_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Render the prompt template with `input` as context.
    ///
    /// Template errors surface as a validation error on the `prompt` field.
    pub fn render_prompt(&self, input: &Value) -> Result<String, ValidationError> {
        let env = Environment::new();
        env.render_str(&self.prompt, input)
            .map(|s| s.trim().to_string())
            .map_err(|e| ValidationError::new("prompt", e.to_string()))
    }

    /// Compose the system instruction from the agent prompt and the flow's own text.
    pub fn system_instruction(&self, agent_prompt: &str) -> String {
        match self.system.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(own) if agent_prompt.trim().is_empty() => own.to_string(),
            Some(own) => format!("{}\n\n{}", agent_prompt.trim(), own),
            None => agent_prompt.trim().to_string(),
        }
    }
}
