//! System prompts and template builders for agents.
//!
//! Prompts are the core instructions that define each agent's behavior.
//! Template builders format user messages with the query and retrieved
//! documentation.

use std::fmt::Write;
use std::path::Path;

/// System prompt for the support specialist (classification workflow).
pub const SUPPORT_SYSTEM_PROMPT: &str = "You are a customer support specialist. \
Answer the customer's question using the provided documentation. \
Be concise, friendly, and give concrete steps where the documentation allows. \
If the documentation is insufficient to resolve the issue, say so and suggest \
escalating to a human support agent.";

/// System prompt for the explorer (exploratory search workflow).
pub const EXPLORER_SYSTEM_PROMPT: &str = "You are a knowledgeable product assistant. \
Answer the user's question using only the documentation excerpts provided. \
If the documentation does not cover part of the question, acknowledge the gap \
plainly instead of guessing. Never fabricate product details, prices, or policies.";

/// Placeholder for the query slot in a support template.
pub const QUERY_SLOT: &str = "{query}";
/// Placeholder for the knowledge slot in a support template.
pub const KNOWLEDGE_SLOT: &str = "{knowledge}";

/// Separator placed between documents when compiling search context.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/support-agent/prompts";

/// Filename for the support specialist prompt template.
const SUPPORT_FILENAME: &str = "support.md";
/// Filename for the explorer prompt template.
const EXPLORER_FILENAME: &str = "explorer.md";

/// A set of system prompts for all agents.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// System prompt for the support specialist.
    pub support: String,
    /// System prompt for the explorer.
    pub explorer: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from config or `--prompt-dir`)
    /// 2. `~/.config/support-agent/prompts/`
    ///
    /// Each file is loaded independently; a missing or blank file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(std::path::PathBuf::from)
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .filter(|content| !content.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            support: load_file(SUPPORT_FILENAME, SUPPORT_SYSTEM_PROMPT),
            explorer: load_file(EXPLORER_FILENAME, EXPLORER_SYSTEM_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            support: SUPPORT_SYSTEM_PROMPT.to_string(),
            explorer: EXPLORER_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (SUPPORT_FILENAME, SUPPORT_SYSTEM_PROMPT),
            (EXPLORER_FILENAME, EXPLORER_SYSTEM_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    #[must_use]
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Fills a support template's query and knowledge slots.
///
/// Both slots are substituted in one scan of the template, so slot text
/// inside the query or the knowledge is left as written. Templates without
/// a knowledge slot get the documentation appended so the model never
/// answers blind.
#[must_use]
pub fn fill_template(template: &str, query: &str, knowledge: &str) -> String {
    let mut filled = String::with_capacity(template.len() + query.len() + knowledge.len());
    let mut rest = template;
    loop {
        let next = [(QUERY_SLOT, query), (KNOWLEDGE_SLOT, knowledge)]
            .into_iter()
            .filter_map(|(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, slot, value)) = next else {
            break;
        };
        filled.push_str(&rest[..at]);
        filled.push_str(value);
        rest = &rest[at + slot.len()..];
    }
    filled.push_str(rest);

    if template.contains(KNOWLEDGE_SLOT) {
        filled
    } else {
        format!("{filled}\n\nRelevant documentation:\n{knowledge}")
    }
}

/// Stand-in knowledge used when retrieval found nothing usable.
#[must_use]
pub fn placeholder_knowledge(description: &str) -> String {
    let topic = if description.trim().is_empty() {
        "this type of request".to_string()
    } else {
        format!("\"{}\" requests", description.trim())
    };
    format!(
        "No specific documentation was found for {topic}. \
         Provide general best-practice guidance and recommend contacting \
         a human support agent if the issue persists."
    )
}

/// Joins document texts into a single context block.
#[must_use]
pub fn compile_context<'a, I>(documents: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    documents
        .into_iter()
        .filter(|doc| !doc.trim().is_empty())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Builds the user message for the explorer agent.
#[must_use]
pub fn build_explorer_prompt(query: &str, context: &str) -> String {
    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "Question: {query}\n\n\
         Documentation excerpts:\n{context}\n\n\
         Answer the question from the documentation above."
    );
    prompt
}
