//! Synchronous building blocks shared by the workflows and the CLI.
//!
//! Nothing in here suspends or touches the network.

pub mod category;
pub mod router;
pub mod sources;

pub use category::Category;
pub use router::{Route, RouteDecision, explain, is_support_query, route};
pub use sources::{attribution_line, dedup_display_names, display_name};
