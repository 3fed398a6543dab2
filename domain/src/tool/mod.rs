//! Tool domain module
//!
//! Tools are typed functions the model backend may call during a
//! generation: business lookup, knowledge-base search, web and image
//! search, calendar availability and booking.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (JSON output)│
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "kb" → "search_knowledge_base"
//!        └─ tools:   "lookup_business" → ToolDefinition
//! ```
//!
//! Every tool degrades to a negative value (not found, empty list,
//! placeholder) so that a failing lookup never aborts the conversation.
//! A failed [`ToolResult`] only means the call itself was unusable.

pub mod entities;
pub mod names;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolEffect, ToolParameter, ToolSpec};
pub use provider::{ProviderError, ToolProvider};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
