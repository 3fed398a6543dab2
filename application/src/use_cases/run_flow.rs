//! Run Flow use case.
//!
//! Executes a [`FlowDefinition`]: validate input, render the prompt, call the
//! model backend, run any tools it asks for, and validate the final answer
//! against the flow's output schema.
//!
//! The runner has no side effects of its own. Persisting usage and cost is
//! the caller's job (see [`ChatService`](super::chat::ChatService)).

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::tool_helpers::{strip_code_fence, tool_args_preview};
use neighborly_domain::{
    AgentConfig, ContentBlock, FlowDefinition, Message, Model, PromptTemplate, TokenUsage,
    ValidationError,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while running a flow.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationError),

    #[error("Model returned no output")]
    EmptyOutput,

    #[error("Invalid output: {0}")]
    InvalidOutput(ValidationError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Input of one flow run.
#[derive(Debug, Clone)]
pub struct FlowInvocation {
    /// Flow input, validated against the flow's input schema.
    pub input: Value,
    /// Earlier conversation turns sent before the rendered prompt.
    pub history: Vec<Message>,
}

impl FlowInvocation {
    pub fn new(input: Value) -> Self {
        Self {
            input,
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }
}

/// Schema-conforming result of a flow run.
#[derive(Debug, Clone)]
pub struct FlowOutput {
    pub output: Value,
    /// Usage summed over every backend call of the run.
    pub usage: TokenUsage,
    pub model: Model,
    pub tool_turns: usize,
}

impl FlowOutput {
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.output.get(name).and_then(Value::as_str)
    }
}

/// Use case for running a flow.
pub struct RunFlowUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    execution: ExecutionParams,
}

impl Clone for RunFlowUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            conversation_logger: self.conversation_logger.clone(),
            execution: self.execution.clone(),
        }
    }
}

impl RunFlowUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            conversation_logger: Arc::new(NoConversationLogger),
            execution: ExecutionParams::default(),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub async fn execute(
        &self,
        flow: &FlowDefinition,
        invocation: FlowInvocation,
        agent: &AgentConfig,
    ) -> Result<FlowOutput, FlowError> {
        flow.input
            .validate(&invocation.input)
            .map_err(FlowError::InvalidInput)?;
        let prompt = flow
            .render_prompt(&invocation.input)
            .map_err(FlowError::InvalidInput)?;

        let model = flow.model.clone().unwrap_or_else(|| agent.model.clone());
        let output_schema = flow.output.to_json_schema();
        let tools = self
            .tool_schema
            .selected_tools_schema(self.tool_executor.tool_spec(), &flow.tools);

        let mut system = flow.system_instruction(&agent.system_prompt);
        if !tools.is_empty() {
            // Gemini rejects responseSchema alongside function declarations.
            system.push_str("\n\n");
            system.push_str(&PromptTemplate::json_output_instruction(&output_schema));
        }

        info!(flow = %flow.name, model = %model, tools = tools.len(), "Running flow");

        let mut messages = invocation.history;
        messages.push(Message::user(prompt));

        let mut request = GenerationRequest::new(model.clone(), messages)
            .with_system(system)
            .with_tools(tools);
        if request.tools.is_empty() {
            request = request.with_response_schema(output_schema);
        }

        let mut response = self.gateway.generate(&request).await?;
        let mut usage = response.usage_or_default();

        let max_turns = self.execution.max_tool_turns;
        let mut turn_count = 0;

        loop {
            let tool_calls = response.tool_calls();
            if tool_calls.is_empty() {
                break;
            }

            turn_count += 1;
            if turn_count > max_turns {
                warn!(flow = %flow.name, "Tool loop exceeded max_tool_turns ({})", max_turns);
                turn_count = max_turns;
                break;
            }

            for call in &tool_calls {
                debug!(flow = %flow.name, tool = %call.tool_name, args = %tool_args_preview(call), "Tool call");
            }
            let futures: Vec<_> = tool_calls
                .iter()
                .map(|call| self.tool_executor.execute(call))
                .collect();
            let results = futures::future::join_all(futures).await;

            let mut result_blocks = Vec::with_capacity(results.len());
            for (i, (call, result)) in tool_calls.iter().zip(results).enumerate() {
                if !result.is_success() {
                    warn!(
                        tool = %call.tool_name,
                        error = result.error().map(|e| e.message.as_str()).unwrap_or(""),
                        "Tool call failed"
                    );
                }
                self.conversation_logger.log(ConversationEvent::new(
                    "tool_call",
                    serde_json::json!({
                        "flow": flow.name,
                        "tool": call.tool_name,
                        "arguments": call.arguments,
                        "success": result.is_success(),
                        "degraded": result.metadata.degraded,
                        "duration_ms": result.metadata.duration_ms,
                    }),
                ));
                result_blocks.push(ContentBlock::ToolResult {
                    id: call
                        .native_id
                        .clone()
                        .unwrap_or_else(|| format!("call-{}-{}", turn_count, i)),
                    name: call.tool_name.clone(),
                    output: result.to_model_payload(),
                });
            }

            debug!(
                "Tool turn {}/{}: sending {} results",
                turn_count,
                max_turns,
                result_blocks.len()
            );

            request.messages.push(Message::from_response(&response));
            request.messages.push(Message::tool_results(result_blocks));
            response = self.gateway.generate(&request).await?;
            usage += response.usage_or_default();
        }

        let text = response.text_content();
        let body = strip_code_fence(&text);
        if body.is_empty() {
            return Err(FlowError::EmptyOutput);
        }

        let output: Value = serde_json::from_str(body).map_err(|e| {
            FlowError::InvalidOutput(ValidationError::root(format!("not valid JSON: {}", e)))
        })?;
        flow.output
            .validate(&output)
            .map_err(FlowError::InvalidOutput)?;

        info!(
            flow = %flow.name,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            tool_turns = turn_count,
            "Flow completed"
        );

        self.conversation_logger.log(ConversationEvent::new(
            "flow_completed",
            serde_json::json!({
                "flow": flow.name,
                "model": model.to_string(),
                "tool_turns": turn_count,
                "usage": usage,
            }),
        ));

        Ok(FlowOutput {
            output,
            usage,
            model,
            tool_turns: turn_count,
        })
    }
}
