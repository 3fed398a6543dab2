//! Business directory and knowledge base over stored documents.
//!
//! Business documents keep their public profile under `businessProfile`;
//! the tool-facing id is the profile's `placeId`, not the document id.
//! Knowledge passages carry an `embedding` vector written at index time.

use super::document_store::JsonDocumentStore;
use async_trait::async_trait;
use neighborly_application::{
    BusinessDirectory, EmbeddingPort, KnowledgeBase, KnowledgeError, RepositoryError,
};
use neighborly_domain::{BusinessInfo, KnowledgeChunk};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

pub const BUSINESSES: &str = "businesses";
pub const KNOWLEDGE: &str = "knowledge";
pub(crate) const PLACE_ID_PATH: &str = "businessProfile.placeId";
const EMBEDDING_FIELD: &str = "embedding";

pub struct DocumentBusinessDirectory {
    store: JsonDocumentStore,
}

impl DocumentBusinessDirectory {
    pub fn new(store: JsonDocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BusinessDirectory for DocumentBusinessDirectory {
    async fn find_business(&self, business_id: &str) -> Result<Option<BusinessInfo>, RepositoryError> {
        let matches = self
            .store
            .find_by_field(BUSINESSES, PLACE_ID_PATH, &json!(business_id))
            .await?;
        let Some(document) = matches.into_iter().next() else {
            debug!(business_id, "Business not in directory");
            return Ok(None);
        };

        let profile = document.data.get("businessProfile").cloned().unwrap_or(Value::Null);
        serde_json::from_value(profile)
            .map(Some)
            .map_err(|e| RepositoryError::Corrupt {
                id: format!("{}/{}", BUSINESSES, document.id),
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct KnowledgeDocument {
    content: String,
    source: String,
    embedding: Vec<f32>,
}

/// Vector search over indexed passages.
pub struct DocumentKnowledgeBase {
    store: JsonDocumentStore,
    embedder: Arc<dyn EmbeddingPort>,
}

impl DocumentKnowledgeBase {
    pub fn new(store: JsonDocumentStore, embedder: Arc<dyn EmbeddingPort>) -> Self {
        Self { store, embedder }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, KnowledgeError> {
        self.embedder
            .embed(text)
            .await
            .map_err(|e| KnowledgeError::Embedding(e.to_string()))
    }

    /// Embed and store a passage, returning its document id.
    pub async fn index(&self, content: &str, source: &str) -> Result<String, KnowledgeError> {
        let embedding = self.embed(content).await?;
        let id = uuid::Uuid::now_v7().to_string();
        let document = KnowledgeDocument {
            content: content.to_string(),
            source: source.to_string(),
            embedding,
        };
        self.store.put(KNOWLEDGE, &id, &document).await?;
        debug!(id = %id, source, "Indexed knowledge passage");
        Ok(id)
    }
}

#[async_trait]
impl KnowledgeBase for DocumentKnowledgeBase {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.embed(query).await?;
        let nearest = self
            .store
            .find_nearest(KNOWLEDGE, EMBEDDING_FIELD, &vector, k)
            .await?;

        let chunks = nearest
            .into_iter()
            .filter_map(|(document, score)| {
                match serde_json::from_value::<KnowledgeDocument>(document.data) {
                    Ok(doc) => {
                        debug!(id = %document.id, score, "Knowledge match");
                        Some(KnowledgeChunk {
                            content: doc.content,
                            source: doc.source,
                        })
                    }
                    Err(e) => {
                        warn!(id = %document.id, error = %e, "Skipping malformed knowledge passage");
                        None
                    }
                }
            })
            .collect();
        Ok(chunks)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use neighborly_application::GatewayError;

    /// Embeds text as letter counts for a handful of keywords.
    pub(crate) struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingPort for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
            let text = text.to_lowercase();
            Ok(["parking", "market", "recycling"]
                .iter()
                .map(|k| text.matches(k).count() as f32 + 0.01)
                .collect())
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl EmbeddingPort for BrokenEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, GatewayError> {
            Err(GatewayError::ConnectionError("offline".to_string()))
        }
    }

    pub(crate) async fn seed_business(store: &JsonDocumentStore) {
        store
            .put(
                BUSINESSES,
                "doc-1",
                &json!({
                    "ownerId": "owner-1",
                    "businessProfile": {
                        "placeId": "abc123",
                        "name": "Corner Bakery",
                        "category": "Bakery",
                        "address": "1 Main St"
                    }
                }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_find_business_by_place_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDocumentStore::new(dir.path());
        seed_business(&store).await;
        let directory = DocumentBusinessDirectory::new(store);

        let info = directory.find_business("abc123").await.unwrap().unwrap();
        assert_eq!(info.name, "Corner Bakery");
        assert_eq!(info.address.as_deref(), Some("1 Main St"));
        assert!(info.phone.is_none());

        assert!(directory.find_business("doc-1").await.unwrap().is_none());
        assert!(directory.find_business("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_knowledge_base_returns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let kb = DocumentKnowledgeBase::new(JsonDocumentStore::new(dir.path()), Arc::new(KeywordEmbedder));
        assert!(kb.search("parking", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_then_search_ranks_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let kb = DocumentKnowledgeBase::new(JsonDocumentStore::new(dir.path()), Arc::new(KeywordEmbedder));

        kb.index("Street parking is free after 6pm.", "faq.md").await.unwrap();
        kb.index("The farmers market runs Saturdays.", "events.md").await.unwrap();
        kb.index("Recycling pickup is on Tuesdays.", "city.md").await.unwrap();

        let hits = kb.search("where is parking?", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "faq.md");

        let hits = kb.search("market day", 2).await.unwrap();
        assert_eq!(hits[0].source, "events.md");
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let kb = DocumentKnowledgeBase::new(JsonDocumentStore::new(dir.path()), Arc::new(BrokenEmbedder));
        let err = kb.search("parking", 3).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Embedding(_)));
    }
}
