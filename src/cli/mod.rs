//! CLI layer for the support agent.
//!
//! Provides the command-line interface using clap, with commands for
//! answering queries, inspecting routing, and querying the knowledge service.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
