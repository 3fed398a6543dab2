//! Console formatting for command results

use colored::Colorize;
use neighborly_application::{ChatReply, FlowOutput};
use neighborly_domain::{
    AgentConfig, AgentScope, ChatMessage, ChatSession, FlowCatalog, Model, RateTable, Role,
    ToolResult,
};
use rust_decimal::Decimal;

pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn reply(reply: &ChatReply) -> String {
        let mut output = String::new();
        output.push_str(&reply.reply.text);
        output.push('\n');
        output.push_str(&Self::footer(&format!(
            "session {} | {} messages | ${} total",
            reply.session.id,
            reply.session.message_count(),
            reply.session.totals.cost
        )));
        output
    }

    /// One line per session.
    pub fn session_list(sessions: &[ChatSession]) -> String {
        if sessions.is_empty() {
            return "No sessions.\n".to_string();
        }
        let mut output = String::new();
        for session in sessions {
            output.push_str(&format!(
                "{}  {:<20} {:>3} msgs  {:>8} tokens  ${}  {}\n",
                session.id.as_str().yellow(),
                session.participant.name,
                session.message_count(),
                session.totals.total_tokens,
                session.totals.cost,
                session.updated_at.format("%Y-%m-%d %H:%M")
            ));
        }
        output
    }

    pub fn session(session: &ChatSession) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("Session {}", session.id)));

        let participant = &session.participant;
        let mut contact = participant.name.clone();
        if let Some(phone) = &participant.phone {
            contact.push_str(&format!(", {}", phone));
        }
        if let Some(email) = &participant.email {
            contact.push_str(&format!(", {}", email));
        }
        output.push_str(&format!("{} {}\n\n", "Participant:".cyan().bold(), contact));

        for message in session.messages() {
            output.push_str(&Self::message(message));
        }

        let totals = &session.totals;
        output.push_str(&Self::footer(&format!(
            "{} in / {} out / {} total tokens | ${}",
            totals.input_tokens, totals.output_tokens, totals.total_tokens, totals.cost
        )));
        output
    }

    fn message(message: &ChatMessage) -> String {
        let label = match message.role {
            Role::User => "user".green().bold(),
            Role::Model => "model".blue().bold(),
            Role::Admin => "staff".magenta().bold(),
        };
        let mut line = format!(
            "[{}] {}: {}\n",
            message.created_at.format("%H:%M:%S"),
            label,
            message.text
        );
        if let Some(record) = &message.usage {
            line.push_str(&format!(
                "{}\n",
                format!("    {} tokens, ${}", record.usage.total_tokens, record.cost).dimmed()
            ));
        }
        line
    }

    pub fn flow_list(catalog: &FlowCatalog) -> String {
        let mut output = String::new();
        for flow in catalog.all() {
            output.push_str(&format!("{}\n  {}\n", flow.name.yellow().bold(), flow.description));
            for field in flow.input.fields() {
                let marker = if field.required { "*" } else { " " };
                output.push_str(&format!("    {}{}  {}\n", marker, field.name, field.description));
            }
            if !flow.tools.is_empty() {
                output.push_str(&format!("    tools: {}\n", flow.tools.join(", ")));
            }
        }
        output
    }

    pub fn flow_output(result: &FlowOutput, rates: &RateTable) -> String {
        let mut output = String::new();
        let pretty = serde_json::to_string_pretty(&result.output).unwrap_or_else(|_| result.output.to_string());
        output.push_str(&pretty);
        output.push('\n');
        let cost = rates.cost(&result.model, result.usage.input_tokens, result.usage.output_tokens);
        output.push_str(&Self::footer(&format!(
            "{} | {} tokens | {} tool turns | ${}",
            result.model, result.usage.total_tokens, result.tool_turns, cost
        )));
        output
    }

    pub fn tool_result(result: &ToolResult) -> String {
        let payload = result.to_model_payload();
        let pretty = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let status = if !result.is_success() {
            "failed".red().bold()
        } else if result.metadata.degraded {
            "no result".yellow().bold()
        } else {
            "ok".green().bold()
        };
        format!("{} {}\n{}\n", result.tool_name.cyan().bold(), status, pretty)
    }

    pub fn agent(scope: &AgentScope, config: &AgentConfig) -> String {
        format!(
            "{} {}\n{} {}\n{}\n{}\n",
            "Scope:".cyan().bold(),
            scope,
            "Model:".cyan().bold(),
            config.model,
            "System prompt:".cyan().bold(),
            config.system_prompt
        )
    }

    pub fn cost(model: &Model, input_tokens: u64, output_tokens: u64, cost: Decimal, listed: bool) -> String {
        let mut output = format!(
            "{} {} in + {} out = ${}\n",
            model.as_str().yellow(),
            input_tokens,
            output_tokens,
            cost
        );
        if !listed {
            output.push_str(&format!("{}\n", "(model not in rate table, fallback rate used)".dimmed()));
        }
        output
    }

    fn header(title: &str) -> String {
        format!("{}\n", format!("== {} ==", title).bold())
    }

    fn footer(text: &str) -> String {
        format!("{}\n", format!("-- {}", text).dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighborly_domain::{Participant, TokenUsage, UsageRecord};
    use rust_decimal::Decimal;

    fn session() -> ChatSession {
        let mut session = ChatSession::new(Participant::new("Dana").with_email("dana@example.com"));
        session.append(ChatMessage::user("Is the bakery open?"));
        session.append(ChatMessage::model(
            "Yes, until six.",
            UsageRecord::new(TokenUsage::new(100, 20), Decimal::new(5, 5)),
        ));
        session.append(ChatMessage::admin("Closed on holidays."));
        session
    }

    #[test]
    fn test_session_detail_lists_messages_and_totals() {
        let text = ConsoleFormatter::session(&session());
        assert!(text.contains("dana@example.com"));
        assert!(text.contains("Is the bakery open?"));
        assert!(text.contains("Closed on holidays."));
        assert!(text.contains("100 in / 20 out / 120 total tokens"));
    }

    #[test]
    fn test_empty_session_list() {
        assert_eq!(ConsoleFormatter::session_list(&[]), "No sessions.\n");
    }

    #[test]
    fn test_flow_list_marks_required_inputs() {
        let text = ConsoleFormatter::flow_list(&FlowCatalog::builtin());
        assert!(text.contains("blog_post_draft"));
        assert!(text.contains("*topic"));
    }

    #[test]
    fn test_cost_mentions_fallback_for_unlisted_model() {
        let model = Model::Custom("gemini-next".to_string());
        let text = ConsoleFormatter::cost(&model, 10, 10, Decimal::ZERO, false);
        assert!(text.contains("fallback rate"));
    }
}
