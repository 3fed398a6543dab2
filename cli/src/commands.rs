//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for neighborly
#[derive(Parser, Debug)]
#[command(name = "neighborly")]
#[command(author, version, about = "AI assistant and content flows for a community platform")]
#[command(long_about = r#"
Runs the community assistant and the content-generation flows against the
Gemini API, with tools for business lookup, knowledge-base search, web and
image search, and calendar booking.

Configuration files are loaded from (in priority order):
1. NEIGHBORLY_* environment variables (e.g. NEIGHBORLY_GEMINI__TIMEOUT_SECONDS)
2. --config <path>          Explicit config file
3. ./neighborly.toml        Project-level config
4. ~/.config/neighborly/config.toml   Global config

Example:
  neighborly chat --name Dana --business abc123 "Are you open on Sunday?"
  neighborly flow run blog_post_draft --input '{"topic": "Spring cleanup day"}'
  neighborly slots --business abc123 --date 2024-05-14
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment still applies)
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a message to the assistant
    Chat(ChatArgs),

    /// Add a staff note to a session without a model reply
    AdminNote {
        #[arg(long, value_name = "ID")]
        session: String,
        text: String,
    },

    /// Inspect stored chat sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// List or run content flows
    #[command(subcommand)]
    Flow(FlowCommand),

    /// Cost of a generation from token counts
    Cost {
        #[arg(long, short)]
        model: String,
        #[arg(long = "input-tokens", value_name = "N")]
        input_tokens: u64,
        #[arg(long = "output-tokens", value_name = "N")]
        output_tokens: u64,
    },

    /// Free appointment slots of a business on a day
    Slots {
        #[arg(long, value_name = "ID")]
        business: String,
        /// Day to check (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },

    /// Book an appointment in a business owner's calendar
    Book {
        #[arg(long, value_name = "ID")]
        business: String,
        #[arg(long)]
        title: String,
        /// Start time (RFC 3339, or local YYYY-MM-DDTHH:MM)
        #[arg(long)]
        start: String,
        #[arg(long, value_name = "MINUTES")]
        duration: Option<i64>,
    },

    /// Show or change the assistant configuration
    #[command(subcommand)]
    Agent(AgentCommand),

    /// Manage the knowledge base
    #[command(subcommand)]
    Kb(KbCommand),

    /// Show configuration file locations and the effective configuration
    Config,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    pub message: String,

    /// Continue an existing session
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,

    /// Participant name (used when starting a session)
    #[arg(long, default_value = "Guest")]
    pub name: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Business the conversation is about
    #[arg(long, value_name = "ID")]
    pub business: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Print a session's messages and totals
    Show { id: String },
    /// List sessions, most recent first
    List,
}

#[derive(Subcommand, Debug)]
pub enum FlowCommand {
    /// List the built-in flows
    List,
    /// Run a flow with a JSON input object
    Run {
        name: String,
        #[arg(long, short, value_name = "JSON")]
        input: String,
        /// Use this business's assistant configuration
        #[arg(long, value_name = "ID")]
        business: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentCommand {
    /// Print the effective configuration
    Show {
        #[arg(long, value_name = "ID")]
        business: Option<String>,
    },
    /// Store a configuration (unset fields keep their current value)
    Set {
        #[arg(long, value_name = "ID")]
        business: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum KbCommand {
    /// Index a passage
    Add {
        text: String,
        #[arg(long, default_value = "manual")]
        source: String,
    },
    /// Search passages as the assistant would
    Search { query: String },
}
