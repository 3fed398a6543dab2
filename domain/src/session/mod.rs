//! Model conversation types.
//!
//! - [`entities::Message`]: a turn sent to the model backend
//! - [`response::LlmResponse`]: a structured reply with usage

pub mod entities;
pub mod response;

pub use entities::{Message, TurnRole};
pub use response::{ContentBlock, LlmResponse, StopReason};
