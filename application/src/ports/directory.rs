//! Read-only lookups the tools use: business directory and knowledge base.

use crate::ports::repository::RepositoryError;
use async_trait::async_trait;
use neighborly_domain::{BusinessInfo, KnowledgeChunk};
use thiserror::Error;

#[async_trait]
pub trait BusinessDirectory: Send + Sync {
    /// Find a business by its place id. `Ok(None)` when no profile matches.
    async fn find_business(&self, business_id: &str) -> Result<Option<BusinessInfo>, RepositoryError>;
}

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// The `k` chunks nearest to `query`; empty when nothing is indexed.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError>;
}
