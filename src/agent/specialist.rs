//! Support specialist agent for classified support queries.
//!
//! Receives a category template already filled with the customer's query
//! and the retrieved documentation, and writes the reply.

use async_trait::async_trait;

use super::config::AgentConfig;
use super::traits::Agent;

/// Agent that answers classified support requests.
pub struct SupportSpecialistAgent {
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl SupportSpecialistAgent {
    /// Creates a new support specialist with the given configuration and system prompt.
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
impl Agent for SupportSpecialistAgent {
    fn name(&self) -> &'static str {
        "support_specialist"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn temperature(&self) -> f32 {
        0.2
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
