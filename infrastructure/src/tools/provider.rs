//! Community tool provider
//!
//! Serves the community platform tools. Each tool is advertised only when
//! its backing service was supplied; web and image search are always
//! advertised because they degrade on their own when unconfigured.

use async_trait::async_trait;
use neighborly_application::{BusinessDirectory, KnowledgeBase};
use neighborly_domain::tool::{
    DefaultToolValidator, ToolValidator,
    entities::{ToolCall, ToolDefinition},
    names::{
        CHECK_AVAILABILITY, CREATE_APPOINTMENT, LOOKUP_BUSINESS, SEARCH_IMAGE, SEARCH_KNOWLEDGE_BASE,
        WEB_SEARCH,
    },
    provider::{ProviderError, ToolProvider},
    value_objects::{ToolError, ToolResult},
};
use std::sync::Arc;
use std::time::Instant;

use crate::tools::business::{lookup_business, lookup_business_definition};
use crate::tools::calendar::{CalendarTools, check_availability_definition, create_appointment_definition};
use crate::tools::knowledge::{search_knowledge_base, search_knowledge_base_definition};
use crate::tools::web::{GoogleWebSearch, UnsplashImageSearch, search_image_definition, web_search_definition};

pub const COMMUNITY_PROVIDER_ID: &str = "community";
pub const DEFAULT_KNOWLEDGE_TOP_K: usize = 3;

pub struct CommunityToolProvider {
    directory: Option<Arc<dyn BusinessDirectory>>,
    knowledge: Option<Arc<dyn KnowledgeBase>>,
    knowledge_top_k: usize,
    web_search: Option<GoogleWebSearch>,
    image_search: Option<UnsplashImageSearch>,
    calendar: Option<CalendarTools>,
}

impl CommunityToolProvider {
    pub fn new() -> Self {
        Self {
            directory: None,
            knowledge: None,
            knowledge_top_k: DEFAULT_KNOWLEDGE_TOP_K,
            web_search: None,
            image_search: None,
            calendar: None,
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn BusinessDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_knowledge_base(mut self, knowledge: Arc<dyn KnowledgeBase>, top_k: usize) -> Self {
        self.knowledge = Some(knowledge);
        self.knowledge_top_k = top_k;
        self
    }

    pub fn with_web_search(mut self, search: GoogleWebSearch) -> Self {
        self.web_search = Some(search);
        self
    }

    pub fn with_image_search(mut self, search: UnsplashImageSearch) -> Self {
        self.image_search = Some(search);
        self
    }

    pub fn with_calendar(mut self, calendar: CalendarTools) -> Self {
        self.calendar = Some(calendar);
        self
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        let mut tools = Vec::new();
        if self.directory.is_some() {
            tools.push(lookup_business_definition());
        }
        if self.knowledge.is_some() {
            tools.push(search_knowledge_base_definition());
        }
        if self.web_search.is_some() {
            tools.push(web_search_definition());
        }
        if self.image_search.is_some() {
            tools.push(search_image_definition());
        }
        if self.calendar.is_some() {
            tools.push(check_availability_definition());
            tools.push(create_appointment_definition());
        }
        tools
    }

    async fn execute_internal(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let definition = self
            .definitions()
            .into_iter()
            .find(|d| d.name == call.tool_name)
            .ok_or_else(|| ToolError::not_found(&call.tool_name))?;
        DefaultToolValidator
            .validate(call, &definition)
            .map_err(ToolError::invalid_argument)?;

        let name = call.tool_name.as_str();
        let required = |key: &str| call.require_string(key).map_err(ToolError::invalid_argument);

        let result = match (name, self) {
            (LOOKUP_BUSINESS, Self { directory: Some(directory), .. }) => {
                let lookup = lookup_business(directory.as_ref(), required("businessId")?).await;
                ToolResult::from_outcome(name, &lookup).degraded(!lookup.is_found())
            }
            (SEARCH_KNOWLEDGE_BASE, Self { knowledge: Some(knowledge), .. }) => {
                let results =
                    search_knowledge_base(knowledge.as_ref(), required("query")?, self.knowledge_top_k).await;
                ToolResult::from_outcome(name, &results).with_result_count(results.results.len())
            }
            (WEB_SEARCH, Self { web_search: Some(search), .. }) => {
                let results = search.search(required("query")?).await;
                ToolResult::from_outcome(name, &results)
                    .with_result_count(results.results.len())
                    .degraded(!search.is_configured())
            }
            (SEARCH_IMAGE, Self { image_search: Some(search), .. }) => {
                let image = search.search(required("query")?).await;
                ToolResult::from_outcome(name, &image).degraded(image.is_placeholder())
            }
            (CHECK_AVAILABILITY, Self { calendar: Some(calendar), .. }) => {
                let availability = calendar
                    .check_availability(required("businessId")?, required("date")?)
                    .await;
                ToolResult::from_outcome(name, &availability)
                    .with_result_count(availability.available_slots.len())
                    .degraded(availability.error.is_some())
            }
            (CREATE_APPOINTMENT, Self { calendar: Some(calendar), .. }) => {
                let outcome = calendar
                    .create_appointment(
                        required("businessId")?,
                        required("title")?,
                        required("startTime")?,
                        call.get_i64("durationMinutes"),
                    )
                    .await;
                ToolResult::from_outcome(name, &outcome).degraded(!outcome.success)
            }
            _ => return Err(ToolError::not_found(name)),
        };

        Ok(result)
    }
}

impl Default for CommunityToolProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for CommunityToolProvider {
    fn id(&self) -> &str {
        COMMUNITY_PROVIDER_ID
    }

    fn display_name(&self) -> &str {
        "Community Tools"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(self.definitions())
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let result = match self.execute_internal(call).await {
            Ok(result) => result,
            Err(e) => ToolResult::failure(&call.tool_name, e),
        };
        result.with_duration(start.elapsed().as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::directory::tests::{KeywordEmbedder, seed_business};
    use crate::storage::{DocumentBusinessDirectory, DocumentKnowledgeBase, JsonDocumentStore};
    use crate::tools::calendar::tests::{FakeCalendar, OneOwner};
    use crate::tools::registry::ToolRegistry;
    use neighborly_application::ToolExecutorPort;
    use serde_json::json;

    async fn full_registry(dir: &std::path::Path) -> ToolRegistry {
        let store = JsonDocumentStore::new(dir);
        seed_business(&store).await;
        let knowledge = DocumentKnowledgeBase::new(store.clone(), Arc::new(KeywordEmbedder));
        knowledge.index("Parking permits are issued at city hall.", "faq.md").await.unwrap();

        let client = reqwest::Client::new();
        let provider = CommunityToolProvider::new()
            .with_directory(Arc::new(DocumentBusinessDirectory::new(store)))
            .with_knowledge_base(Arc::new(knowledge), 3)
            .with_web_search(GoogleWebSearch::new(client.clone(), "http://127.0.0.1:9"))
            .with_image_search(UnsplashImageSearch::new(client, "http://127.0.0.1:9"))
            .with_calendar(CalendarTools::new(Arc::new(OneOwner), Arc::new(FakeCalendar::default())));

        let mut registry = ToolRegistry::new().register(provider);
        registry.discover().await;
        registry
    }

    #[tokio::test]
    async fn test_discovers_only_configured_tools() {
        let provider = CommunityToolProvider::new()
            .with_image_search(UnsplashImageSearch::new(reqwest::Client::new(), "http://127.0.0.1:9"));
        let names: Vec<_> = provider
            .discover_tools()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec![SEARCH_IMAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_business_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = full_registry(dir.path()).await;

        let call = ToolCall::new("business").with_arg("businessId", "unknown");
        let result = registry.execute(&call).await;
        assert!(result.is_success());
        assert_eq!(result.output().unwrap(), &json!({"isFound": false}));
        assert!(result.metadata.degraded);

        let call = ToolCall::new(LOOKUP_BUSINESS).with_arg("businessId", "abc123");
        let result = registry.execute(&call).await;
        assert_eq!(result.output().unwrap()["name"], "Corner Bakery");
    }

    #[tokio::test]
    async fn test_missing_argument_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let registry = full_registry(dir.path()).await;

        let result = registry.execute(&ToolCall::new(CHECK_AVAILABILITY).with_arg("businessId", "abc123")).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");

        let blank = ToolCall::new(WEB_SEARCH).with_arg("query", "   ");
        assert_eq!(registry.execute(&blank).await.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_search_tools_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let registry = full_registry(dir.path()).await;

        let web = registry.execute(&ToolCall::new("web").with_arg("query", "farmers market")).await;
        assert_eq!(web.output().unwrap(), &json!({"results": []}));

        let image = registry.execute(&ToolCall::new("image").with_arg("query", "bake sale")).await;
        assert_eq!(image.output().unwrap()["photoId"], "placeholder");
        assert_eq!(image.output().unwrap()["imageHint"], "bake sale");

        let kb = registry.execute(&ToolCall::new("kb").with_arg("query", "parking")).await;
        assert_eq!(kb.output().unwrap()["results"][0]["source"], "faq.md");
        assert_eq!(kb.metadata.result_count, Some(1));
    }

    #[tokio::test]
    async fn test_calendar_tools_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = full_registry(dir.path()).await;

        let call = ToolCall::new("availability")
            .with_arg("businessId", "abc123")
            .with_arg("date", "2024-05-14");
        let result = registry.execute(&call).await;
        let slots = result.output().unwrap()["availableSlots"].as_array().unwrap().clone();
        assert_eq!(slots.len(), 7);

        let call = ToolCall::new(CREATE_APPOINTMENT)
            .with_arg("businessId", "abc123")
            .with_arg("title", "Cake tasting")
            .with_arg("startTime", "2024-05-14T15:00:00Z")
            .with_arg("durationMinutes", 30);
        let result = registry.execute(&call).await;
        assert_eq!(result.output().unwrap(), &json!({"success": true, "eventId": "evt-1"}));
        assert!(result.metadata.duration_ms.is_some());
    }

    fn booking(duration: serde_json::Value) -> ToolCall {
        ToolCall::new(CREATE_APPOINTMENT)
            .with_arg("businessId", "abc123")
            .with_arg("title", "Cake tasting")
            .with_arg("startTime", "2024-05-14T15:00:00Z")
            .with_arg("durationMinutes", duration)
    }

    #[tokio::test]
    async fn test_create_appointment_odd_durations() {
        let dir = tempfile::tempdir().unwrap();
        let registry = full_registry(dir.path()).await;

        // Out of the bookable range: a soft failure, never a panic
        for duration in [json!(i64::MAX), json!(i64::MAX / 2), json!(1e15), json!("100000")] {
            let result = registry.execute(&booking(duration.clone())).await;
            assert!(result.is_success(), "{}", duration);
            assert_eq!(result.output().unwrap(), &json!({"success": false}), "{}", duration);
            assert!(result.metadata.degraded);
        }

        // Non-positive: the default duration is used
        for duration in [json!(-5), json!(0), json!("-5")] {
            let result = registry.execute(&booking(duration.clone())).await;
            assert_eq!(result.output().unwrap()["success"], true, "{}", duration);
        }

        // Not an integer at all: a malformed call
        for duration in [json!("abc"), json!(1e30), json!(true)] {
            let result = registry.execute(&booking(duration.clone())).await;
            assert!(!result.is_success(), "{}", duration);
            assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        }
    }
}
