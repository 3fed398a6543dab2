//! Tool provider abstraction
//!
//! A [`ToolProvider`] is a source of tools plugged into the registry.
//! Providers are consulted in priority order; when two offer the same
//! tool name, the higher priority one serves it.
//!
//! ```text
//!        ToolRegistry
//!      ┌──────┴───────┐
//!  community      (test / extra
//!  provider        providers)
//! ```

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;

/// Error type for tool provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider is missing configuration it cannot work without
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),
}

/// Source of tools for the registry
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier, e.g. "community"
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Higher wins when two providers expose the same tool name
    fn priority(&self) -> i32 {
        0
    }

    async fn is_available(&self) -> bool;

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError>;

    /// Execute a call for one of the discovered tools
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
