//! Chat use case.
//!
//! A session moves from "no session" to active on its first message and
//! stays active; there is no closed state. Each member message is appended,
//! answered through the `community_assistant` flow, and the reply is
//! appended with its usage and cost.
//!
//! Posts to the same session are serialized with a per-session lock so that
//! append, generate, append happens as one unit. Different sessions run
//! concurrently.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::repository::{ChatRepository, RepositoryError};
use crate::use_cases::run_flow::{FlowError, FlowInvocation, RunFlowUseCase};
use neighborly_domain::flow::catalog;
use neighborly_domain::util::preview;
use neighborly_domain::{
    AgentConfig, ChatMessage, ChatSession, FlowDefinition, Participant, PromptTemplate,
    RateTable, SessionId, UsageRecord,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Message text cannot be empty")]
    EmptyMessage,

    #[error("Flow did not return a reply")]
    MissingReply,

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A member's message.
#[derive(Debug, Clone)]
pub struct SendMessage {
    /// Existing session, or `None` to start a new one.
    pub session_id: Option<SessionId>,
    pub participant: Participant,
    pub text: String,
    /// Business the conversation is about, if any.
    pub business_id: Option<String>,
    /// Assistant configuration resolved by the caller for this request.
    pub agent: AgentConfig,
}

impl SendMessage {
    pub fn new(participant: Participant, text: impl Into<String>, agent: AgentConfig) -> Self {
        Self {
            session_id: None,
            participant,
            text: text.into(),
            business_id: None,
            agent,
        }
    }

    pub fn in_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn about_business(mut self, business_id: impl Into<String>) -> Self {
        self.business_id = Some(business_id.into());
        self
    }
}

/// Result of [`ChatService::send_message`].
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session: ChatSession,
    pub reply: ChatMessage,
}

type LockMap = std::sync::Mutex<HashMap<SessionId, Arc<Mutex<()>>>>;

/// Exclusive hold on one session. Dropping it releases the session and
/// removes the map entry once nobody else holds or waits for it.
struct SessionGuard<'a> {
    locks: &'a LockMap,
    id: SessionId,
    _held: OwnedMutexGuard<()>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // One reference in the map, one inside `_held`
        if locks.get(&self.id).is_some_and(|lock| Arc::strong_count(lock) <= 2) {
            locks.remove(&self.id);
        }
    }
}

pub struct ChatService {
    repository: Arc<dyn ChatRepository>,
    run_flow: RunFlowUseCase,
    flow: FlowDefinition,
    rates: RateTable,
    conversation_logger: Arc<dyn ConversationLogger>,
    locks: LockMap,
}

impl ChatService {
    pub fn new(repository: Arc<dyn ChatRepository>, run_flow: RunFlowUseCase) -> Self {
        Self {
            repository,
            run_flow,
            flow: catalog::community_assistant(),
            rates: RateTable::default(),
            conversation_logger: Arc::new(NoConversationLogger),
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_flow(mut self, flow: FlowDefinition) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    async fn lock_session(&self, id: &SessionId) -> SessionGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(id.clone()).or_default().clone()
        };
        SessionGuard {
            locks: &self.locks,
            id: id.clone(),
            _held: lock.lock_owned().await,
        }
    }

    async fn load(&self, id: &SessionId) -> Result<ChatSession, ChatError> {
        self.repository
            .load(id)
            .await?
            .ok_or_else(|| ChatError::SessionNotFound(id.clone()))
    }

    pub async fn send_message(&self, request: SendMessage) -> Result<ChatReply, ChatError> {
        if request.text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let session_id = request.session_id.clone().unwrap_or_else(SessionId::generate);
        let _guard = self.lock_session(&session_id).await;

        let mut session = match &request.session_id {
            Some(id) => self.load(id).await?,
            None => {
                info!(session_id = %session_id, participant = %request.participant.name, "Starting chat session");
                ChatSession::with_id(session_id.clone(), request.participant.clone())
            }
        };

        let history = PromptTemplate::history_turns(session.messages());
        let user_message = ChatMessage::user(request.text.trim());
        let user_message_id = user_message.id.clone();
        session.append(user_message);
        self.repository.save(&session).await?;

        let mut input = serde_json::json!({
            "message": request.text.trim(),
            "participantName": session.participant.name,
        });
        if let Some(business_id) = &request.business_id {
            input["businessId"] = serde_json::Value::String(business_id.clone());
        }

        let output = match self
            .run_flow
            .execute(&self.flow, FlowInvocation::new(input).with_history(history), &request.agent)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Assistant reply failed");
                return Err(e.into());
            }
        };

        let reply_text = output.field_str("reply").ok_or(ChatError::MissingReply)?;
        let cost = self.rates.cost(
            &output.model,
            output.usage.input_tokens,
            output.usage.output_tokens,
        );
        let reply = ChatMessage::model(reply_text, UsageRecord::new(output.usage, cost))
            .in_reply_to(user_message_id);
        session.append(reply.clone());
        self.repository.save(&session).await?;

        info!(
            session_id = %session_id,
            messages = session.message_count(),
            total_tokens = session.totals.total_tokens,
            "Chat reply stored"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "chat_message",
            serde_json::json!({
                "session_id": session_id,
                "model": output.model.to_string(),
                "usage": output.usage,
                "cost": cost,
                "preview": preview(reply_text, 80),
            }),
        ));

        Ok(ChatReply { session, reply })
    }

    /// Append a staff note without invoking the model.
    pub async fn post_admin_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<ChatSession, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let _guard = self.lock_session(session_id).await;

        let mut session = self.load(session_id).await?;
        session.append(ChatMessage::admin(text.trim()));
        self.repository.save(&session).await?;

        info!(session_id = %session_id, "Staff note added");
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Result<ChatSession, ChatError> {
        self.load(session_id).await
    }

    /// All sessions, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>, ChatError> {
        let mut sessions = self.repository.list().await?;
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::use_cases::run_flow::tests::{
        MockGateway, MockToolExecutor, MockToolSchema, text_response,
    };
    use async_trait::async_trait;
    use neighborly_domain::{Model, Role, TokenUsage, TurnRole};
    use rust_decimal_macros::dec;

    #[derive(Default)]
    struct InMemoryChatRepository {
        sessions: std::sync::Mutex<HashMap<SessionId, ChatSession>>,
    }

    #[async_trait]
    impl ChatRepository for InMemoryChatRepository {
        async fn load(&self, id: &SessionId) -> Result<Option<ChatSession>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().get(id).cloned())
        }

        async fn save(&self, session: &ChatSession) -> Result<(), RepositoryError> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.id.clone(), session.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<ChatSession>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().values().cloned().collect())
        }
    }

    fn service(gateway: Arc<MockGateway>, repository: Arc<InMemoryChatRepository>) -> ChatService {
        let run_flow = RunFlowUseCase::new(
            gateway,
            Arc::new(MockToolExecutor::new()),
            Arc::new(MockToolSchema),
        );
        ChatService::new(repository, run_flow)
    }

    fn agent() -> AgentConfig {
        AgentConfig::new(Model::Gemini20Flash, "You are helpful.")
    }

    fn member() -> Participant {
        Participant::new("Rosa").with_email("rosa@example.org")
    }

    #[tokio::test]
    async fn test_first_message_creates_session() {
        let gateway = Arc::new(MockGateway::new(vec![text_response(
            r#"{"reply": "Hello Rosa!"}"#,
            1000,
            500,
        )]));
        let repository = Arc::new(InMemoryChatRepository::default());
        let chat = service(gateway, repository.clone());

        let reply = chat
            .send_message(SendMessage::new(member(), "Hi there", agent()))
            .await
            .unwrap();

        let session = &reply.session;
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[0].role, Role::User);
        assert_eq!(reply.reply.role, Role::Model);
        assert_eq!(reply.reply.text, "Hello Rosa!");
        assert_eq!(reply.reply.reply_to.as_ref(), Some(&session.messages()[0].id));

        // gemini-2.0-flash: 1000 * 0.10/1M + 500 * 0.40/1M
        let usage = reply.reply.usage.as_ref().unwrap();
        assert_eq!(usage.usage, TokenUsage::new(1000, 500));
        assert_eq!(usage.cost, dec!(0.0003));
        assert_eq!(session.totals.total_tokens, 1500);
        assert_eq!(session.totals.cost, dec!(0.0003));

        let stored = repository.load(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.message_count(), 2);
    }

    #[tokio::test]
    async fn test_follow_up_sends_history_with_staff_notes() {
        let gateway = Arc::new(MockGateway::new(vec![
            text_response(r#"{"reply": "We open at 8."}"#, 10, 5),
            text_response(r#"{"reply": "Sorry, closed Mondays."}"#, 20, 5),
        ]));
        let repository = Arc::new(InMemoryChatRepository::default());
        let chat = service(gateway.clone(), repository);

        let first = chat
            .send_message(SendMessage::new(member(), "When do you open?", agent()).about_business("abc123"))
            .await
            .unwrap();
        let id = first.session.id.clone();

        chat.post_admin_message(&id, "Closed on Mondays.").await.unwrap();
        let second = chat
            .send_message(SendMessage::new(member(), "Monday?", agent()).in_session(id.clone()))
            .await
            .unwrap();

        assert_eq!(second.session.message_count(), 5);
        assert_eq!(second.session.totals.input_tokens, 30);
        assert_eq!(second.session.totals.output_tokens, 10);

        let requests = gateway.requests.lock().unwrap();
        let first_prompt = requests[0].messages.last().unwrap().text();
        assert!(first_prompt.contains("abc123"));

        let turns = &requests[1].messages;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].role, TurnRole::Model);
        assert!(turns[2].text().starts_with("[Staff note, authoritative] Closed on Mondays."));
        assert!(turns[3].text().contains("Monday?"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_rejected() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let chat = service(gateway, Arc::new(InMemoryChatRepository::default()));

        let err = chat
            .send_message(SendMessage::new(member(), "Hello", agent()).in_session(SessionId::new("missing")))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(_)));

        let err = chat
            .post_admin_message(&SessionId::new("missing"), "note")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_flow_failure_keeps_user_message() {
        let gateway = Arc::new(MockGateway::failing(GatewayError::ConnectionError(
            "refused".to_string(),
        )));
        let repository = Arc::new(InMemoryChatRepository::default());
        let chat = service(gateway, repository.clone());

        let err = chat
            .send_message(SendMessage::new(member(), "Anyone there?", agent()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Flow(FlowError::Gateway(_))));

        let sessions = chat.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].message_count(), 1);
        assert_eq!(sessions[0].messages()[0].role, Role::User);
        assert!(sessions[0].totals.total_tokens == 0);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let chat = service(
            Arc::new(MockGateway::new(vec![])),
            Arc::new(InMemoryChatRepository::default()),
        );
        let err = chat
            .send_message(SendMessage::new(member(), "   ", agent()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn test_concurrent_posts_are_serialized() {
        let gateway = Arc::new(MockGateway::new(vec![
            text_response(r#"{"reply": "one"}"#, 1, 1),
            text_response(r#"{"reply": "two"}"#, 1, 1),
            text_response(r#"{"reply": "three"}"#, 1, 1),
        ]));
        let repository = Arc::new(InMemoryChatRepository::default());
        let chat = Arc::new(service(gateway, repository));

        let first = chat
            .send_message(SendMessage::new(member(), "start", agent()))
            .await
            .unwrap();
        let id = first.session.id.clone();

        let a = {
            let chat = chat.clone();
            let id = id.clone();
            tokio::spawn(async move {
                chat.send_message(SendMessage::new(member(), "a", agent()).in_session(id))
                    .await
            })
        };
        let b = {
            let chat = chat.clone();
            let id = id.clone();
            tokio::spawn(async move {
                chat.send_message(SendMessage::new(member(), "b", agent()).in_session(id))
                    .await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let session = chat.get_session(&id).await.unwrap();
        assert_eq!(session.message_count(), 6);
        let roles: Vec<_> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Model, Role::User, Role::Model, Role::User, Role::Model]
        );
    }

    fn held_locks(chat: &ChatService) -> usize {
        chat.locks.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_session_locks_are_released() {
        let replies = (0..50)
            .map(|i| text_response(&format!(r#"{{"reply": "hi {}"}}"#, i), 1, 1))
            .collect();
        let chat = service(
            Arc::new(MockGateway::new(replies)),
            Arc::new(InMemoryChatRepository::default()),
        );

        let mut last = None;
        for i in 0..50 {
            let reply = chat
                .send_message(SendMessage::new(member(), format!("hello {}", i), agent()))
                .await
                .unwrap();
            last = Some(reply.session.id);
        }
        assert_eq!(held_locks(&chat), 0);

        chat.post_admin_message(&last.unwrap(), "note").await.unwrap();
        assert!(chat.post_admin_message(&SessionId::new("missing"), "note").await.is_err());
        assert!(chat
            .send_message(SendMessage::new(member(), "Hi", agent()).in_session(SessionId::new("missing")))
            .await
            .is_err());
        assert_eq!(held_locks(&chat), 0);
    }

    #[tokio::test]
    async fn test_failed_reply_releases_lock() {
        let chat = service(
            Arc::new(MockGateway::failing(GatewayError::Timeout)),
            Arc::new(InMemoryChatRepository::default()),
        );
        assert!(chat.send_message(SendMessage::new(member(), "Hello?", agent())).await.is_err());
        assert_eq!(held_locks(&chat), 0);
    }

    #[tokio::test]
    async fn test_waiting_post_keeps_lock_entry() {
        let chat = Arc::new(service(
            Arc::new(MockGateway::new(vec![text_response(r#"{"reply": "hi"}"#, 1, 1)])),
            Arc::new(InMemoryChatRepository::default()),
        ));
        let id = chat
            .send_message(SendMessage::new(member(), "start", agent()))
            .await
            .unwrap()
            .session
            .id;

        let guard = chat.lock_session(&id).await;
        let waiter = {
            let chat = chat.clone();
            let id = id.clone();
            tokio::spawn(async move { chat.post_admin_message(&id, "queued note").await })
        };
        // Let the waiter clone the lock and block on it
        while Arc::strong_count(&chat.locks.lock().unwrap()[&id]) < 3 {
            tokio::task::yield_now().await;
        }
        drop(guard);
        assert_eq!(held_locks(&chat), 1);

        waiter.await.unwrap().unwrap();
        assert_eq!(held_locks(&chat), 0);
    }
}
