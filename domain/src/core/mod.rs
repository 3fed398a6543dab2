//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: generative model identifiers
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
