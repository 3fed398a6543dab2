//! Wiring: builds the adapters from configuration and hands them to the use cases.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neighborly_application::{
    ChatService, ConfigureAgentUseCase, ConversationLogger, EmbeddingPort, GatewayError,
    GenerationRequest, LlmGateway, NoConversationLogger, RunFlowUseCase, ToolExecutorPort,
};
use neighborly_domain::{FlowCatalog, LlmResponse, RateTable, ToolCall, ToolResult};
use neighborly_infrastructure::{
    CalendarTools, CommunityToolProvider, DocumentAgentConfigStore, DocumentBusinessDirectory,
    DocumentCalendarAccounts, DocumentChatRepository, DocumentKnowledgeBase, FileConfig,
    GeminiGateway, GoogleCalendarClient, GoogleWebSearch, JsonDocumentStore,
    JsonSchemaToolConverter, JsonlConversationLogger, ToolRegistry, UnsplashImageSearch,
    http_client,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stands in for the model backend when no API key is configured.
///
/// Commands that never reach the model (sessions, cost, slots) keep working.
struct MissingCredentials {
    env_var: String,
}

impl MissingCredentials {
    fn error(&self) -> GatewayError {
        GatewayError::AuthenticationFailed(format!(
            "no Gemini API key configured; set {} or gemini.api_key",
            self.env_var
        ))
    }
}

#[async_trait]
impl LlmGateway for MissingCredentials {
    async fn generate(&self, _request: &GenerationRequest) -> Result<LlmResponse, GatewayError> {
        Err(self.error())
    }
}

#[async_trait]
impl EmbeddingPort for MissingCredentials {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, GatewayError> {
        Err(self.error())
    }
}

pub struct App {
    pub chat: ChatService,
    pub flows: RunFlowUseCase,
    pub agents: ConfigureAgentUseCase,
    pub catalog: FlowCatalog,
    pub rates: RateTable,
    pub knowledge: Arc<DocumentKnowledgeBase>,
    tools: Arc<ToolRegistry>,
}

impl App {
    pub async fn build(config: &FileConfig) -> Result<Self> {
        let client = http_client(Duration::from_secs(config.gemini.timeout_seconds))
            .context("failed to build HTTP client")?;
        let data_dir = config.storage.resolve_data_dir();
        debug!(data_dir = %data_dir.display(), "Using document store");
        let store = JsonDocumentStore::new(data_dir);

        let gateway: Arc<dyn LlmGateway>;
        let embedder: Arc<dyn EmbeddingPort>;
        let has_model = match config.gemini.resolve_api_key() {
            Some(key) => {
                let gemini = Arc::new(
                    GeminiGateway::new(client.clone(), key)
                        .with_base_url(config.gemini.base_url.clone())
                        .with_embedding_model(config.gemini.embedding_model.clone()),
                );
                gateway = gemini.clone();
                embedder = gemini;
                true
            }
            None => {
                warn!(env = %config.gemini.api_key_env, "Gemini API key not set, model calls will fail");
                let missing = Arc::new(MissingCredentials {
                    env_var: config.gemini.api_key_env.clone(),
                });
                gateway = missing.clone();
                embedder = missing;
                false
            }
        };

        let execution = config.execution_params();
        let knowledge = Arc::new(DocumentKnowledgeBase::new(store.clone(), embedder));

        let web = &config.tools.web_search;
        let calendar = CalendarTools::new(
            Arc::new(DocumentCalendarAccounts::new(store.clone())),
            Arc::new(GoogleCalendarClient::new(client.clone(), config.calendar.base_url.clone())),
        )
        .with_working_hours(config.calendar.working_hours()?)
        .with_default_duration(execution.default_appointment_minutes);

        let mut provider = CommunityToolProvider::new()
            .with_directory(Arc::new(DocumentBusinessDirectory::new(store.clone())))
            .with_web_search(
                GoogleWebSearch::new(client.clone(), web.base_url.clone())
                    .with_credentials(web.resolve_api_key(), web.engine_id.clone()),
            )
            .with_image_search(
                UnsplashImageSearch::new(client.clone(), config.tools.image_search.base_url.clone())
                    .with_access_key(config.tools.image_search.resolve_access_key()),
            )
            .with_calendar(calendar);
        if has_model {
            provider = provider.with_knowledge_base(knowledge.clone(), execution.knowledge_top_k);
        }

        let mut registry = ToolRegistry::new().register(provider);
        registry.discover().await;
        let stats = registry.stats();
        info!(
            providers = stats.total_providers,
            tools = stats.total_tools,
            "Tool registry ready"
        );
        let tools = Arc::new(registry);

        let conversation_logger: Arc<dyn ConversationLogger> = match &config.logging.conversation_log {
            Some(path) => match JsonlConversationLogger::open(path) {
                Some(logger) => Arc::new(logger),
                None => Arc::new(NoConversationLogger),
            },
            None => Arc::new(NoConversationLogger),
        };

        let rates = config.rate_table();
        let flows = RunFlowUseCase::new(gateway, tools.clone(), Arc::new(JsonSchemaToolConverter))
            .with_conversation_logger(conversation_logger.clone())
            .with_execution(execution);
        let chat = ChatService::new(Arc::new(DocumentChatRepository::new(store.clone())), flows.clone())
            .with_rates(rates.clone())
            .with_conversation_logger(conversation_logger);
        let agents = ConfigureAgentUseCase::new(Arc::new(DocumentAgentConfigStore::new(store)))
            .with_default(config.agent.to_agent_config());

        Ok(Self {
            chat,
            flows,
            agents,
            catalog: FlowCatalog::builtin(),
            rates,
            knowledge,
            tools,
        })
    }

    /// Run one tool the way the model would.
    pub async fn call_tool(&self, call: ToolCall) -> ToolResult {
        self.tools.execute(&call).await
    }
}
