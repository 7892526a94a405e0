//! Query processor: the single entry point for answering a query.
//!
//! Routes each query and dispatches it to the matching workflow. Holds only
//! read-only configuration, so one processor can serve concurrent queries.

use std::sync::Arc;

use tracing::info;

use super::answer::{Answer, AnswerKind};
use super::classification::ClassificationWorkflow;
use super::config::AgentConfig;
use super::exploratory::ExploratoryWorkflow;
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use crate::core::{Route, explain};
use crate::mcp::KnowledgeService;

/// Queries run by the demo harness, in order.
pub const DEMO_QUERIES: &[&str] = &[
    "How do I reset my password?",
    "My laptop won't turn on",
    "I want to return a damaged item",
    "Can you help me set up two-factor authentication?",
    "Tell me about your products",
    "What products do you offer?",
];

/// Answer for a query with no content.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question so I can help.";

/// Routes queries to the classification or exploratory workflow.
pub struct QueryProcessor {
    classification: ClassificationWorkflow,
    exploratory: ExploratoryWorkflow,
}

impl QueryProcessor {
    /// Creates a processor, loading prompts from [`AgentConfig::prompt_dir`].
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        knowledge: Arc<dyn KnowledgeService>,
        config: AgentConfig,
    ) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self::with_prompts(provider, knowledge, config, &prompts)
    }

    /// Creates a processor with an explicit prompt set.
    #[must_use]
    pub fn with_prompts(
        provider: Arc<dyn LlmProvider>,
        knowledge: Arc<dyn KnowledgeService>,
        config: AgentConfig,
        prompts: &PromptSet,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            classification: ClassificationWorkflow::new(
                Arc::clone(&provider),
                Arc::clone(&knowledge),
                Arc::clone(&config),
                prompts,
            ),
            exploratory: ExploratoryWorkflow::new(provider, knowledge, config, prompts),
        }
    }

    /// Answers one query.
    pub async fn process(&self, query: &str) -> Answer {
        let query = query.trim();
        if query.is_empty() {
            return Answer::plain(Route::Exploratory, AnswerKind::Halted, EMPTY_QUERY_MESSAGE);
        }

        let decision = explain(query);
        info!(
            route = decision.route.as_str(),
            keyword = decision.keyword,
            pattern = decision.pattern,
            "query routed"
        );

        match decision.route {
            Route::Support => self.classification.run(query).await,
            Route::Exploratory => self.exploratory.run(query).await,
        }
    }

    /// Runs each query in turn, pairing it with its answer.
    pub async fn run_demo(&self, queries: &[&str]) -> Vec<(String, Answer)> {
        let mut answers = Vec::with_capacity(queries.len());
        for query in queries {
            answers.push(((*query).to_string(), self.process(query).await));
        }
        answers
    }
}
