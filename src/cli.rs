use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "fiqh",
    about = "Offline fiqh question answering over a curated knowledge base"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a question from the knowledge base
    Ask(AskArgs),
    /// Show how a question is scored against every topic
    Explain(ExplainArgs),
    /// List known topics and their key phrases
    Topics(OutputArgs),
    /// Show knowledge base statistics and active weights
    Stats(OutputArgs),
    /// Manage persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Ask / Explain --

#[derive(Debug, Parser)]
pub struct AskArgs {
    /// The question, in free text
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct ExplainArgs {
    /// The question, in free text
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also list topics that scored zero
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Config subcommands --

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print a setting
    Get {
        /// Setting name (e.g. min_score)
        key: String,
    },
    /// Store a setting
    Set {
        /// Setting name (e.g. min_score)
        key: String,
        /// New value
        value: String,
    },
    /// Remove a setting (revert to default)
    Unset {
        /// Setting name
        key: String,
    },
    /// List stored settings
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "fiqh",
            &mut std::io::stdout(),
        );
    }
}
