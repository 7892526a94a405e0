//! CLI command implementations.
//!
//! Each command returns its rendered output; `main` writes it to stdout.
//! Async work runs on a runtime created per command.

use std::io::Write as IoWrite;
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::agent::config::{AgentConfig, AgentConfigBuilder};
use crate::agent::prompt::PromptSet;
use crate::agent::{DEMO_QUERIES, QueryProcessor, create_provider};
use crate::cli::output::{
    OutputFormat, format_answer, format_categories, format_demo, format_route, format_stats,
    format_validation,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::explain;
use crate::error::{CommandError, Result};
use crate::mcp::{KnowledgeService, KnowledgeTools, McpKnowledgeService, Reply};

/// Words that end an interactive session.
const EXIT_WORDS: &[&str] = &["quit", "exit", "q"];

/// Executes the parsed CLI command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the knowledge service
/// cannot be reached for a listing command, or output cannot be written.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Ask { query } => cmd_ask(cli, query, format),
        Commands::Interactive => cmd_interactive(cli, format),
        Commands::Demo => cmd_demo(cli, format),
        Commands::Route { query } => Ok(format_route(query, &explain(query), format)),
        Commands::Categories => cmd_categories(cli, format),
        Commands::Stats => cmd_stats(cli, format),
        Commands::Validate { query } => cmd_validate(cli, query, format),
        Commands::InitPrompts { dir } => {
            cmd_init_prompts(dir.as_deref().or(cli.prompt_dir.as_deref()), format)
        }
    }
}

/// Builds agent configuration: CLI flags, then environment, then defaults.
fn config_builder(cli: &Cli) -> AgentConfigBuilder {
    let mut builder = AgentConfig::builder();
    if let Some(endpoint) = &cli.endpoint {
        builder = builder.knowledge_endpoint(endpoint.clone());
    }
    if let Some(model) = &cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(k) = cli.top_k {
        builder = builder.top_k(k);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    if let Some(dir) = &cli.prompt_dir {
        builder = builder.prompt_dir(dir.clone());
    }
    builder.from_env()
}

fn build_processor(cli: &Cli) -> Result<QueryProcessor> {
    let config = config_builder(cli).build().map_err(|e| {
        CommandError::ExecutionFailed(format!("Agent configuration error: {e}"))
    })?;

    let provider = create_provider(&config)
        .map_err(|e| CommandError::ExecutionFailed(format!("Provider creation failed: {e}")))?;
    let knowledge = McpKnowledgeService::from_config(&config);
    debug!(
        endpoint = knowledge.endpoint(),
        model = %config.model,
        top_k = config.top_k,
        "agent configured"
    );

    Ok(QueryProcessor::new(
        Arc::from(provider),
        Arc::new(knowledge),
        config,
    ))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

fn cmd_ask(cli: &Cli, query: &str, format: OutputFormat) -> Result<String> {
    let processor = build_processor(cli)?;
    let answer = runtime()?.block_on(processor.process(query));
    Ok(format_answer(&answer, format))
}

fn cmd_demo(cli: &Cli, format: OutputFormat) -> Result<String> {
    let processor = build_processor(cli)?;
    let results = runtime()?.block_on(processor.run_demo(DEMO_QUERIES));
    Ok(format_demo(&results, format))
}

/// Reads queries from stdin until EOF, an exit word, or Ctrl-C.
///
/// Answers are written as they are produced, so nothing is returned.
fn cmd_interactive(cli: &Cli, format: OutputFormat) -> Result<String> {
    let processor = build_processor(cli)?;

    runtime()?.block_on(async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = std::io::stdout();
        writeln!(
            stdout,
            "Customer support agent. Ask a question, or type 'quit' to exit."
        )?;

        loop {
            write!(stdout, "\n> ")?;
            stdout.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                break;
            };

            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if EXIT_WORDS.contains(&query.to_lowercase().as_str()) {
                break;
            }

            let answer = processor.process(query).await;
            write!(stdout, "{}", format_answer(&answer, format))?;
        }

        writeln!(stdout)?;
        Ok::<_, std::io::Error>(())
    })?;

    Ok(String::new())
}

fn cmd_categories(cli: &Cli, format: OutputFormat) -> Result<String> {
    let builder = config_builder(cli);
    let service = builder.knowledge_service();
    let timeout = builder.call_timeout();
    let reply = runtime()?.block_on(async {
        let mut session = service.open().await?;
        let reply = KnowledgeTools::new(session.as_ref(), timeout).list_categories().await;
        session.close().await;
        reply
    })?;
    Ok(format_categories(&accept(reply)?, format))
}

fn cmd_stats(cli: &Cli, format: OutputFormat) -> Result<String> {
    let builder = config_builder(cli);
    let service = builder.knowledge_service();
    let timeout = builder.call_timeout();
    let reply = runtime()?.block_on(async {
        let mut session = service.open().await?;
        let reply = KnowledgeTools::new(session.as_ref(), timeout).stats().await;
        session.close().await;
        reply
    })?;
    Ok(format_stats(&accept(reply)?, format))
}

fn cmd_validate(cli: &Cli, query: &str, format: OutputFormat) -> Result<String> {
    let builder = config_builder(cli);
    let service = builder.knowledge_service();
    let timeout = builder.call_timeout();
    let reply = runtime()?.block_on(async {
        let mut session = service.open().await?;
        let reply = KnowledgeTools::new(session.as_ref(), timeout).validate(query).await;
        session.close().await;
        reply
    })?;
    Ok(format_validation(&accept(reply)?, format))
}

/// Turns a tool reply into a command result.
fn accept<T>(reply: Reply<T>) -> Result<T> {
    match reply {
        Reply::Payload(value) => Ok(value),
        Reply::Error(message) => Err(CommandError::ExecutionFailed(message).into()),
        Reply::Malformed(detail) => Err(CommandError::ExecutionFailed(format!(
            "Unexpected response from knowledge service: {detail}"
        ))
        .into()),
    }
}

fn cmd_init_prompts(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(std::path::PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| {
            CommandError::ExecutionFailed(
                "Could not determine home directory for default prompt path".to_string(),
            )
        })?;

    let written = PromptSet::write_defaults(&target_dir).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to write prompt templates: {e}"))
    })?;

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                return Ok(format!(
                    "All prompt templates already exist in: {}\n",
                    target_dir.display()
                ));
            }
            let mut output = format!(
                "Wrote {} prompt template(s) to: {}\n",
                written.len(),
                target_dir.display()
            );
            for path in &written {
                output.push_str("  ");
                output.push_str(
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                );
                output.push('\n');
            }
            output.push_str("\nEdit these files to customize the agents' system prompts.\n");
            Ok(output)
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "directory": target_dir.to_string_lossy(),
                "written": written.iter().map(|p| p.to_string_lossy().into_owned()).collect::<Vec<_>>(),
                "count": written.len()
            });
            Ok(format.to_json(&json))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    fn cli(command: Commands) -> Cli {
        Cli {
            endpoint: None,
            model: None,
            top_k: None,
            timeout: None,
            prompt_dir: None,
            verbose: false,
            format: "text".to_string(),
            command,
        }
    }

    #[test]
    fn test_route_command_is_offline() {
        let output = execute(&cli(Commands::Route {
            query: "My laptop won't turn on".to_string(),
        }))
        .unwrap_or_else(|_| unreachable!());
        assert!(output.starts_with("support\n"));
    }

    #[test]
    fn test_init_prompts_writes_once() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());

        let output = cmd_init_prompts(Some(dir.path()), OutputFormat::Text)
            .unwrap_or_else(|_| unreachable!());
        assert!(output.starts_with("Wrote 2 prompt template(s)"));
        assert!(dir.path().join("support.md").exists());
        assert!(dir.path().join("explorer.md").exists());

        let output = cmd_init_prompts(Some(dir.path()), OutputFormat::Text)
            .unwrap_or_else(|_| unreachable!());
        assert!(output.starts_with("All prompt templates already exist"));
    }

    #[test]
    fn test_config_builder_prefers_flags() {
        let mut cli = cli(Commands::Demo);
        cli.endpoint = Some("http://kb.internal:9000/mcp/".to_string());
        cli.top_k = Some(7);

        let config = config_builder(&cli)
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.knowledge_endpoint, "http://kb.internal:9000/mcp/");
        assert_eq!(config.top_k, 7);
        assert!(config.search_top_k >= 7);
    }

    #[test]
    fn test_accept_reply() {
        assert_eq!(accept(Reply::Payload(3)).unwrap_or_default(), 3);
        assert!(matches!(
            accept::<u8>(Reply::Error("Knowledge base not indexed".to_string())),
            Err(Error::Command(CommandError::ExecutionFailed(ref m))) if m == "Knowledge base not indexed"
        ));
        assert!(accept::<u8>(Reply::Malformed("not a mapping".to_string())).is_err());
    }
}
