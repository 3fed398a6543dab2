//! Flows: prompt templates bound to typed input and output schemas.
//!
//! - [`schema`]: field types and validation with path-named errors
//! - [`definition`]: [`FlowDefinition`] and prompt rendering
//! - [`catalog`]: the platform's built-in flows

pub mod catalog;
pub mod definition;
pub mod schema;

pub use catalog::FlowCatalog;
pub use definition::FlowDefinition;
pub use schema::{Field, FieldType, Schema, ValidationError};
