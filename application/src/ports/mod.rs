//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod calendar;
pub mod conversation_logger;
pub mod directory;
pub mod embedding;
pub mod llm_gateway;
pub mod repository;
pub mod tool_executor;
pub mod tool_schema;
