//! Application-level configuration.
//!
//! - [`ExecutionParams`]: tool loop and retrieval limits

pub mod execution_params;

pub use execution_params::ExecutionParams;
