//! Exploratory search workflow for open-ended questions.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::answer::{Answer, AnswerKind};
use super::config::AgentConfig;
use super::explorer::ExplorerAgent;
use super::fallback::exploratory_fallback;
use super::prompt::{PromptSet, build_explorer_prompt, compile_context};
use super::provider::LlmProvider;
use super::traits::Agent;
use crate::core::{Route, dedup_display_names};
use crate::error::ToolError;
use crate::mcp::{KnowledgeService, KnowledgeSession, KnowledgeTools, Reply};

/// Answer returned when broad search finds nothing.
pub const NO_MATCHES_MESSAGE: &str = "I'm sorry, I couldn't find relevant information about that \
in our documentation. Please try rephrasing your question, or contact our support team for help.";

/// Answers open-ended questions from a broad semantic search.
pub struct ExploratoryWorkflow {
    provider: Arc<dyn LlmProvider>,
    knowledge: Arc<dyn KnowledgeService>,
    config: Arc<AgentConfig>,
    explorer: ExplorerAgent,
}

impl ExploratoryWorkflow {
    /// Creates the workflow.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        knowledge: Arc<dyn KnowledgeService>,
        config: Arc<AgentConfig>,
        prompts: &PromptSet,
    ) -> Self {
        let explorer = ExplorerAgent::new(&config, prompts.explorer.clone());
        Self {
            provider,
            knowledge,
            config,
            explorer,
        }
    }

    /// Answers one exploratory query. Never fails; every outcome is an [`Answer`].
    pub async fn run(&self, query: &str) -> Answer {
        let mut session = match self.knowledge.open().await {
            Ok(session) => session,
            Err(e) => return diagnostic(&e),
        };

        let outcome = self.run_in_session(session.as_ref(), query).await;
        session.close().await;

        outcome.unwrap_or_else(|e| diagnostic(&e))
    }

    async fn run_in_session(
        &self,
        session: &dyn KnowledgeSession,
        query: &str,
    ) -> Result<Answer, ToolError> {
        let tools = KnowledgeTools::new(session, self.config.timeout);

        // Over-fetch: there is no category filter to narrow the search.
        let results = match tools.search(query, self.config.search_top_k).await? {
            Reply::Payload(results) => results,
            Reply::Error(message) => {
                return Ok(Answer::plain(Route::Exploratory, AnswerKind::Halted, message));
            }
            Reply::Malformed(detail) => {
                return Ok(Answer::plain(
                    Route::Exploratory,
                    AnswerKind::Halted,
                    format!("The documentation search returned an unexpected response: {detail}"),
                ));
            }
        };

        if results.matches.is_empty() {
            info!("search returned no matches");
            return Ok(Answer::plain(
                Route::Exploratory,
                AnswerKind::NoMatches,
                NO_MATCHES_MESSAGE,
            ));
        }

        let top = &results.matches[..results.matches.len().min(self.config.top_k)];
        let context = compile_context(top.iter().map(|m| m.document.as_str()));
        let sources = dedup_display_names(top.iter().filter_map(|m| m.source_id()));
        info!(
            fetched = results.matches.len(),
            used = top.len(),
            sources = sources.len(),
            "search context compiled"
        );

        let prompt = build_explorer_prompt(query, &context);
        let answer = match self
            .explorer
            .execute_within(self.provider.as_ref(), &prompt, self.config.timeout)
            .await
        {
            Ok(response) => {
                debug!(
                    agent = self.explorer.name(),
                    tokens = response.usage.total_tokens,
                    "exploratory answer generated"
                );
                Answer::with_sources(
                    Route::Exploratory,
                    AnswerKind::Generated,
                    &response.content,
                    sources,
                )
            }
            Err(e) => {
                warn!(error = %e, "generation failed, using fallback answer");
                Answer::with_sources(
                    Route::Exploratory,
                    AnswerKind::Fallback,
                    &exploratory_fallback(top),
                    sources,
                )
            }
        };

        Ok(answer)
    }
}

fn diagnostic(error: &ToolError) -> Answer {
    warn!(error = %error, "exploratory workflow aborted");
    Answer::diagnostic(
        Route::Exploratory,
        &format!("Error processing exploratory query: {error}"),
    )
}
