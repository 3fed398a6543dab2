//! Embedding port: text to vector, used by knowledge search and ingestion.

use crate::ports::llm_gateway::GatewayError;
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError>;
}
