//! Explorer agent for open-ended questions.
//!
//! Answers from compiled search context and is told to admit gaps.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::traits::Agent;

/// Agent that synthesizes answers to exploratory questions.
pub struct ExplorerAgent {
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl ExplorerAgent {
    /// Creates a new explorer agent with the given configuration and system prompt.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            system_prompt,
        }
    }
}

#[async_trait]
impl Agent for ExplorerAgent {
    fn name(&self) -> &'static str {
        "explorer"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn temperature(&self) -> f32 {
        0.3
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
