//! CLI entrypoint for neighborly
//!
//! Loads configuration, wires the layers together and dispatches one
//! command per invocation.

mod app;
mod commands;
mod output;

use anyhow::{Context, Result, bail};
use app::App;
use clap::Parser;
use commands::{AgentCommand, ChatArgs, Cli, Command, FlowCommand, KbCommand, SessionCommand};
use neighborly_application::{FlowInvocation, SendMessage};
use neighborly_domain::tool::names::{CHECK_AVAILABILITY, CREATE_APPOINTMENT, SEARCH_KNOWLEDGE_BASE};
use neighborly_domain::{AgentScope, Model, Participant, SessionId, ToolCall};
use neighborly_infrastructure::{ConfigLoader, FileConfig};
use output::ConsoleFormatter;
use serde_json::{Value, json};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "neighborly.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            tracing_subscriber::registry().with(console).with(file).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scope_for(business: Option<String>) -> AgentScope {
    business.map(AgentScope::Business).unwrap_or(AgentScope::Global)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());

    info!("Starting neighborly");

    match &cli.command {
        Command::Config => {
            for line in ConfigLoader::describe_sources() {
                println!("{}", line);
            }
            println!();
            println!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        Command::Cost {
            model,
            input_tokens,
            output_tokens,
        } => {
            let rates = config.rate_table();
            let (input_tokens, output_tokens) = (*input_tokens, *output_tokens);
            let model = Model::from(model.as_str());
            let cost = rates.cost(&model, input_tokens, output_tokens);
            if cli.json {
                print_json(&json!({
                    "model": model,
                    "inputTokens": input_tokens,
                    "outputTokens": output_tokens,
                    "cost": cost,
                }))?;
            } else {
                print!(
                    "{}",
                    ConsoleFormatter::cost(&model, input_tokens, output_tokens, cost, rates.is_listed(&model))
                );
            }
            return Ok(());
        }
        _ => {}
    }

    // === Dependency Injection ===
    let app = App::build(&config).await?;

    match cli.command {
        Command::Chat(args) => chat(&app, args, cli.json).await?,
        Command::AdminNote { session, text } => {
            let session = app.chat.post_admin_message(&SessionId::new(session), &text).await?;
            if cli.json {
                print_json(&session)?;
            } else {
                println!("Staff note added to session {}", session.id);
            }
        }
        Command::Session(SessionCommand::Show { id }) => {
            let session = app.chat.get_session(&SessionId::new(id)).await?;
            if cli.json {
                print_json(&session)?;
            } else {
                print!("{}", ConsoleFormatter::session(&session));
            }
        }
        Command::Session(SessionCommand::List) => {
            let sessions = app.chat.list_sessions().await?;
            if cli.json {
                print_json(&sessions)?;
            } else {
                print!("{}", ConsoleFormatter::session_list(&sessions));
            }
        }
        Command::Flow(FlowCommand::List) => print!("{}", ConsoleFormatter::flow_list(&app.catalog)),
        Command::Flow(FlowCommand::Run { name, input, business }) => {
            let Some(flow) = app.catalog.get(&name) else {
                bail!("unknown flow '{}' (available: {})", name, app.catalog.names().join(", "));
            };
            let input: Value = serde_json::from_str(&input).context("--input must be a JSON object")?;
            let agent = app.agents.resolve(&scope_for(business)).await?;
            let result = app.flows.execute(flow, FlowInvocation::new(input), &agent).await?;
            if cli.json {
                print_json(&result.output)?;
            } else {
                print!("{}", ConsoleFormatter::flow_output(&result, &app.rates));
            }
        }
        Command::Slots { business, date } => {
            let call = ToolCall::new(CHECK_AVAILABILITY)
                .with_arg("businessId", business)
                .with_arg("date", date);
            print_tool(&app, call, cli.json).await?;
        }
        Command::Book {
            business,
            title,
            start,
            duration,
        } => {
            let mut call = ToolCall::new(CREATE_APPOINTMENT)
                .with_arg("businessId", business)
                .with_arg("title", title)
                .with_arg("startTime", start);
            if let Some(minutes) = duration {
                call = call.with_arg("durationMinutes", minutes);
            }
            print_tool(&app, call, cli.json).await?;
        }
        Command::Agent(AgentCommand::Show { business }) => {
            let scope = scope_for(business);
            let config = app.agents.resolve(&scope).await?;
            if cli.json {
                print_json(&config)?;
            } else {
                print!("{}", ConsoleFormatter::agent(&scope, &config));
            }
        }
        Command::Agent(AgentCommand::Set { business, model, prompt }) => {
            if model.is_none() && prompt.is_none() {
                bail!("nothing to change: pass --model and/or --prompt");
            }
            let scope = scope_for(business);
            let mut config = app.agents.resolve(&scope).await?;
            if let Some(model) = model {
                config.model = Model::from(model.as_str());
            }
            if let Some(prompt) = prompt {
                config.system_prompt = prompt;
            }
            app.agents.update(&scope, config.clone()).await?;
            print!("{}", ConsoleFormatter::agent(&scope, &config));
        }
        Command::Kb(KbCommand::Add { text, source }) => {
            let id = app.knowledge.index(&text, &source).await?;
            println!("Indexed passage {}", id);
        }
        Command::Kb(KbCommand::Search { query }) => {
            let call = ToolCall::new(SEARCH_KNOWLEDGE_BASE).with_arg("query", query);
            print_tool(&app, call, cli.json).await?;
        }
        Command::Config | Command::Cost { .. } => {}
    }

    Ok(())
}

async fn chat(app: &App, args: ChatArgs, as_json: bool) -> Result<()> {
    let scope = scope_for(args.business.clone());
    let agent = app.agents.resolve(&scope).await?;

    let mut participant = Participant::new(args.name);
    if let Some(phone) = args.phone {
        participant = participant.with_phone(phone);
    }
    if let Some(email) = args.email {
        participant = participant.with_email(email);
    }

    let mut request = SendMessage::new(participant, args.message, agent);
    if let Some(session) = args.session {
        request = request.in_session(SessionId::new(session));
    }
    if let Some(business) = args.business {
        request = request.about_business(business);
    }

    let reply = app.chat.send_message(request).await?;
    if as_json {
        print_json(&json!({
            "sessionId": reply.session.id,
            "reply": reply.reply,
            "totals": reply.session.totals,
        }))?;
    } else {
        print!("{}", ConsoleFormatter::reply(&reply));
    }
    Ok(())
}

async fn print_tool(app: &App, call: ToolCall, as_json: bool) -> Result<()> {
    let result = app.call_tool(call).await;
    if as_json {
        print_json(&result)?;
    } else {
        print!("{}", ConsoleFormatter::tool_result(&result));
    }
    Ok(())
}
