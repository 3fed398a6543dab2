//! Domain layer for neighborly-assist
//!
//! Entities, value objects, and pure functions of the assistant layer of a
//! community platform. No I/O lives here.
//!
//! # Core Concepts
//!
//! ## Flows
//!
//! A [`FlowDefinition`] binds a prompt template to typed input and output
//! [`Schema`]s. The application layer runs it against a model backend.
//!
//! ## Chat sessions
//!
//! A [`ChatSession`] is an append-only log of messages from the member, the
//! model, and platform staff. Model replies carry token usage and cost which
//! the session accumulates.
//!
//! ## Tools
//!
//! Functions the model may call mid-generation. Lookups never fail on "not
//! found"; their negative outcomes are ordinary values such as
//! [`BusinessLookup::NotFound`].

pub mod agent;
pub mod calendar;
pub mod chat;
pub mod core;
pub mod directory;
pub mod flow;
pub mod pricing;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use agent::{AgentConfig, AgentScope, DEFAULT_SYSTEM_PROMPT};
pub use calendar::{
    AppointmentOutcome, AppointmentRequest, Availability, BusyInterval, MAX_APPOINTMENT_MINUTES,
    WorkingHours, available_slots,
};
pub use chat::{
    ChatMessage, ChatSession, MessageId, Participant, Role, SessionId, SessionTotals, TokenUsage,
    UsageRecord,
};
pub use core::{error::DomainError, model::Model};
pub use directory::{
    BusinessInfo, BusinessLookup, ImageSuggestion, KnowledgeChunk, PLACEHOLDER_PHOTO_ID,
    SearchResults, WebSearchResult,
};
pub use flow::{Field, FieldType, FlowCatalog, FlowDefinition, Schema, ValidationError};
pub use pricing::{ModelRate, RateTable, calculate_cost};
pub use prompt::PromptTemplate;
pub use session::{ContentBlock, LlmResponse, Message, StopReason, TurnRole};
pub use tool::{
    DefaultToolValidator, ProviderError, ToolCall, ToolDefinition, ToolEffect, ToolError,
    ToolParameter, ToolProvider, ToolResult, ToolResultMetadata, ToolSpec, ToolValidator,
};
