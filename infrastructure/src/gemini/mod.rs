//! Google Generative Language API (Gemini) adapter.

pub mod adapter;
pub mod types;

pub use adapter::GeminiGateway;
