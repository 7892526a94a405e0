//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// support-agent: answers customer questions from an MCP knowledge service.
///
/// Support requests are classified and answered from category-scoped
/// documentation; open-ended questions go through a broad semantic search.
#[derive(Parser, Debug)]
#[command(name = "support-agent")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Knowledge-service MCP endpoint.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model used to write answers.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Number of knowledge chunks used per answer.
    #[arg(short = 'k', long, global = true)]
    pub top_k: Option<usize>,

    /// Bound on each tool call and model call, in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory with prompt template overrides.
    #[arg(long, global = true)]
    pub prompt_dir: Option<PathBuf>,

    /// Enable verbose (debug) logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a single question.
    #[command(after_help = r#"Examples:
  support-agent ask "How do I reset my password?"
  support-agent ask "Tell me about your products"
  support-agent --format json ask "My laptop won't turn on" | jq .kind
  SUPPORT_MCP_ENDPOINT=http://kb:8000/mcp/ support-agent ask "refund policy?"
"#)]
    Ask {
        /// The question to answer.
        query: String,
    },

    /// Answer questions read line by line from stdin.
    ///
    /// Type `quit` or `exit`, or send EOF, to leave.
    Interactive,

    /// Run a fixed set of representative queries.
    Demo,

    /// Show which workflow a query would take (offline).
    #[command(after_help = r#"Examples:
  support-agent route "please reset my password"   # support (keyword)
  support-agent route "can you help me?"           # support (pattern)
  support-agent route "what do you sell?"          # exploratory
"#)]
    Route {
        /// The query to route.
        query: String,
    },

    /// List the support categories the knowledge service knows.
    Categories,

    /// Show knowledge-base statistics.
    Stats,

    /// Ask the knowledge service whether a query is suitable for support.
    #[command(after_help = r#"Examples:
  support-agent validate "my account was hacked"
  support-agent --format json validate "hi"
"#)]
    Validate {
        /// The query to check.
        query: String,
    },

    /// Write the default prompt templates for customization.
    ///
    /// Existing files are not overwritten.
    InitPrompts {
        /// Target directory (defaults to `~/.config/support-agent/prompts`).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "support-agent",
            "ask",
            "reset my password",
            "--top-k",
            "4",
            "--format",
            "json",
        ])
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(cli.top_k, Some(4));
        assert_eq!(cli.format, "json");
        assert!(matches!(cli.command, Commands::Ask { ref query } if query == "reset my password"));
    }

    #[test]
    fn test_validate_takes_query() {
        let cli = Cli::try_parse_from(["support-agent", "validate", "my account was hacked"])
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(cli.command, Commands::Validate { ref query } if query == "my account was hacked"));
    }
}
