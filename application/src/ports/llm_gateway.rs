//! LLM Gateway port
//!
//! Defines how the application layer talks to the generative model backend.
//! A single call carries the whole conversation; the backend keeps no state
//! between calls.

use async_trait::async_trait;
use neighborly_domain::{LlmResponse, Message, Model};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: Model,
    /// System instruction (agent prompt plus flow instruction).
    pub system: Option<String>,
    /// Prior turns followed by the rendered prompt and any tool exchanges.
    pub messages: Vec<Message>,
    /// Tool declarations as JSON schema objects (`name`, `description`, `parameters`).
    pub tools: Vec<serde_json::Value>,
    /// JSON schema the final answer must follow, when the backend can enforce it.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn new(model: Model, messages: Vec<Message>) -> Self {
        Self {
            model,
            system: None,
            messages,
            tools: Vec::new(),
            response_schema: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = (!system.trim().is_empty()).then_some(system);
        self
    }

    pub fn with_tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Gateway for model generation
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse, GatewayError>;
}
