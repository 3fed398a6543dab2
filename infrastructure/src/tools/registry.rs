//! Tool Registry
//!
//! The [`ToolRegistry`] aggregates tool providers and implements
//! [`ToolExecutorPort`]. It handles discovery, alias resolution and
//! execution routing based on provider priority.
//!
//! ```ignore
//! let mut registry = ToolRegistry::new().register(CommunityToolProvider::new().with_directory(dir));
//! registry.discover().await;
//!
//! // "business" is an alias of "lookup_business"
//! let call = ToolCall::new("business").with_arg("businessId", "abc123");
//! let result = registry.execute(&call).await;
//! ```
//!
//! `discover()` must run before the registry serves calls:
//!
//! 1. Providers are sorted by priority (highest first)
//! 2. Each available provider's `discover_tools()` is called
//! 3. The first provider to offer a tool name serves it
//! 4. Aliases whose target was discovered are added to the spec

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use neighborly_application::ToolExecutorPort;
use neighborly_domain::tool::{
    entities::{ToolCall, ToolSpec},
    names::ALIASES,
    provider::ToolProvider,
    value_objects::{ToolError, ToolResult},
};
use tracing::{debug, trace, warn};

pub struct ToolRegistry {
    providers: Vec<Arc<dyn ToolProvider>>,
    /// Tool name -> provider ID (filled by discovery)
    tool_mapping: HashMap<String, String>,
    tool_spec: ToolSpec,
    discovered: bool,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            tool_mapping: HashMap::new(),
            tool_spec: ToolSpec::new(),
            discovered: false,
        }
    }

    pub fn register<P: ToolProvider + 'static>(self, provider: P) -> Self {
        self.register_arc(Arc::new(provider))
    }

    pub fn register_arc(mut self, provider: Arc<dyn ToolProvider>) -> Self {
        self.providers.push(provider);
        self.discovered = false;
        self
    }

    /// Discover tools from all providers. A provider that fails discovery
    /// is skipped with a warning.
    pub async fn discover(&mut self) {
        self.providers
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));

        let mut tool_spec = ToolSpec::new();
        let mut tool_mapping = HashMap::new();

        for provider in &self.providers {
            if !provider.is_available().await {
                debug!(provider = provider.id(), "Provider not available, skipping");
                continue;
            }

            match provider.discover_tools().await {
                Ok(tools) => {
                    for tool in tools {
                        if tool_mapping.contains_key(&tool.name) {
                            trace!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "Tool already registered by higher priority provider"
                            );
                            continue;
                        }
                        debug!(tool = %tool.name, provider = provider.id(), "Registered tool");
                        tool_mapping.insert(tool.name.clone(), provider.id().to_string());
                        tool_spec = tool_spec.register(tool);
                    }
                }
                Err(e) => {
                    warn!(provider = provider.id(), error = %e, "Failed to discover tools from provider");
                }
            }
        }

        let aliases = ALIASES
            .iter()
            .filter(|(_, canonical)| tool_mapping.contains_key(*canonical))
            .copied();
        self.tool_spec = tool_spec.register_aliases(aliases);
        self.tool_mapping = tool_mapping;
        self.discovered = true;
    }

    fn provider_for(&self, tool_name: &str) -> Option<&Arc<dyn ToolProvider>> {
        let provider_id = self.tool_mapping.get(tool_name)?;
        self.providers.iter().find(|p| p.id() == provider_id)
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn stats(&self) -> RegistryStats {
        let mut tools_per_provider = HashMap::new();
        for provider_id in self.tool_mapping.values() {
            *tools_per_provider.entry(provider_id.clone()).or_insert(0) += 1;
        }

        RegistryStats {
            total_providers: self.providers.len(),
            total_tools: self.tool_mapping.len(),
            tools_per_provider,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_providers: usize,
    pub total_tools: usize,
    pub tools_per_provider: HashMap<String, usize>,
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if !self.discovered {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed("Registry not initialized. Call discover() first."),
            );
        }

        let Some(canonical) = self.tool_spec.resolve(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        };
        let Some(provider) = self.provider_for(canonical) else {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        };

        if canonical == call.tool_name {
            provider.execute(call).await
        } else {
            trace!(alias = %call.tool_name, tool = canonical, "Resolved tool alias");
            let mut resolved = call.clone();
            resolved.tool_name = canonical.to_string();
            provider.execute(&resolved).await
        }
    }
}
