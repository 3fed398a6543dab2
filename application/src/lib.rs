//! Application layer for neighborly-assist
//!
//! Use cases (flow runner, chat service, assistant configuration) and the
//! ports their adapters implement. Depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    calendar::{CalendarAccount, CalendarAccountResolver, CalendarApi, CalendarError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    directory::{BusinessDirectory, KnowledgeBase, KnowledgeError},
    embedding::EmbeddingPort,
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway},
    repository::{AgentConfigStore, ChatRepository, RepositoryError},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::chat::{ChatError, ChatReply, ChatService, SendMessage};
pub use use_cases::configure_agent::{ConfigureAgentError, ConfigureAgentUseCase};
pub use use_cases::run_flow::{FlowError, FlowInvocation, FlowOutput, RunFlowUseCase};
