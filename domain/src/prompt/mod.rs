//! Prompt text shared across use cases.

mod template;

pub use template::PromptTemplate;
