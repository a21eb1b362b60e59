//! MCP tool implementations.
//!
//! This module contains all tools exposed by the surf server.

pub mod web_read;
pub mod web_search;

pub use web_read::{WebReadParams, read_impl};
pub use web_search::{WebSearchParams, search_impl};
