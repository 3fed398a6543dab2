//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat;
pub mod configure_agent;
pub mod run_flow;
pub(crate) mod tool_helpers;
