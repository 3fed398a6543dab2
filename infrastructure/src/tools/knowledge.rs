//! `search_knowledge_base`: nearest passages from the community knowledge base.

use neighborly_application::KnowledgeBase;
use neighborly_domain::tool::names::SEARCH_KNOWLEDGE_BASE;
use neighborly_domain::{KnowledgeChunk, SearchResults, ToolDefinition, ToolEffect, ToolParameter};
use tracing::warn;

pub fn search_knowledge_base_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_KNOWLEDGE_BASE,
        "Search the community knowledge base (FAQs, local rules, events) for passages \
         relevant to a question.",
        ToolEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::new("query", "What to look for", true))
}

/// The `k` nearest passages; empty on any failure.
pub async fn search_knowledge_base(
    knowledge: &dyn KnowledgeBase,
    query: &str,
    k: usize,
) -> SearchResults<KnowledgeChunk> {
    match knowledge.search(query, k).await {
        Ok(chunks) => SearchResults::new(chunks),
        Err(e) => {
            warn!(tool = SEARCH_KNOWLEDGE_BASE, error = %e, "Knowledge search failed");
            SearchResults::empty()
        }
    }
}
