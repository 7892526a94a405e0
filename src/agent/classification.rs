//! Classification workflow for support queries.
//!
//! Runs classify → template → scoped knowledge → generate against one
//! knowledge-service session. Domain errors halt with the tool's own
//! message; protocol errors become a one-line diagnostic; a failed model
//! call falls back to an answer built from what was already retrieved.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::answer::{Answer, AnswerKind};
use super::config::AgentConfig;
use super::fallback::support_fallback;
use super::prompt::{PromptSet, fill_template, placeholder_knowledge};
use super::provider::LlmProvider;
use super::specialist::SupportSpecialistAgent;
use super::traits::Agent;
use crate::core::{Category, Route, dedup_display_names};
use crate::error::ToolError;
use crate::mcp::{KnowledgeService, KnowledgeSession, KnowledgeTools, Reply};

/// Answers classified support requests.
pub struct ClassificationWorkflow {
    provider: Arc<dyn LlmProvider>,
    knowledge: Arc<dyn KnowledgeService>,
    config: Arc<AgentConfig>,
    specialist: SupportSpecialistAgent,
}

impl ClassificationWorkflow {
    /// Creates the workflow.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        knowledge: Arc<dyn KnowledgeService>,
        config: Arc<AgentConfig>,
        prompts: &PromptSet,
    ) -> Self {
        let specialist = SupportSpecialistAgent::new(&config, prompts.support.clone());
        Self {
            provider,
            knowledge,
            config,
            specialist,
        }
    }

    /// Answers one support query. Never fails; every outcome is an [`Answer`].
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

        // Step 1: Classify
        let classification = match tools.classify(query).await? {
            Reply::Payload(classification) => classification,
            Reply::Error(message) => return Ok(halted(message)),
            Reply::Malformed(detail) => return Ok(halted(unclassified(&detail))),
        };
        let Some(name) = classification.category_name() else {
            return Ok(halted(unclassified("no category in the classifier response")));
        };
        let Some(category) = Category::parse(name) else {
            return Ok(halted(unclassified(&format!("unknown category `{name}`"))));
        };
        info!(
            category = %category,
            confidence = classification.confidence,
            reason = classification.reason.as_deref(),
            alternatives = classification.alternatives.len(),
            "query classified"
        );

        // Step 2: Template (a missing template is not recoverable here)
        let template = match tools.template(category.as_str()).await? {
            Reply::Payload(template) => template,
            Reply::Error(message) => return Ok(halted(message).in_category(category)),
            Reply::Malformed(detail) => {
                return Ok(halted(format!(
                    "I couldn't load the support template for {}: {detail}",
                    category.title()
                ))
                .in_category(category));
            }
        };

        // Step 3: Scoped knowledge
        let retrieved = match tools
            .scoped_knowledge(category.as_str(), query, self.config.top_k)
            .await?
        {
            Reply::Payload(retrieved) => retrieved,
            Reply::Error(message) => return Ok(halted(message).in_category(category)),
            Reply::Malformed(detail) => {
                return Ok(halted(format!(
                    "I couldn't retrieve documentation for {}: {detail}",
                    category.title()
                ))
                .in_category(category));
            }
        };
        let sources = dedup_display_names(retrieved.sources.iter().map(String::as_str));
        let knowledge = if retrieved.is_empty() {
            debug!(category = %category, "no documentation found, using placeholder");
            placeholder_knowledge(&template.description)
        } else {
            retrieved.knowledge.clone()
        };

        // Step 4: Generate
        let user_msg = fill_template(&template.template, query, &knowledge);
        let answer = match self
            .specialist
            .execute_within(self.provider.as_ref(), &user_msg, self.config.timeout)
            .await
        {
            Ok(response) => {
                debug!(
                    agent = self.specialist.name(),
                    tokens = response.usage.total_tokens,
                    sources = sources.len(),
                    "support answer generated"
                );
                Answer::with_sources(
                    Route::Support,
                    AnswerKind::Generated,
                    &response.content,
                    sources,
                )
            }
            Err(e) => {
                warn!(error = %e, category = %category, "generation failed, using fallback answer");
                let excerpt = (!retrieved.is_empty()).then_some(retrieved.knowledge.as_str());
                let body = support_fallback(category, &template.description, excerpt);
                Answer::with_sources(Route::Support, AnswerKind::Fallback, &body, sources)
            }
        };

        Ok(answer.in_category(category))
    }
}

fn halted(message: impl Into<String>) -> Answer {
    Answer::plain(Route::Support, AnswerKind::Halted, message)
}

fn unclassified(detail: &str) -> String {
    format!(
        "I couldn't determine what kind of support request this is ({detail}). \
         Please rephrase your question or contact our support team."
    )
}

fn diagnostic(error: &ToolError) -> Answer {
    warn!(error = %error, "support workflow aborted");
    Answer::diagnostic(Route::Support, &format!("Error processing support query: {error}"))
}
