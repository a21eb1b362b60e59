//! Client code for surf.
//!
//! This crate provides the bounded HTTP fetch pipeline, content-type
//! classification, HTML cleaning, and the web search providers used by the
//! server.

pub mod classify;
pub mod extract;
pub mod fetch;
pub mod read;
pub mod search;

pub use classify::classify;
pub use extract::HtmlCleaner;
pub use fetch::{FetchClient, FetchConfig, FetchOutcome, FetchResponse};
pub use read::Reader;
pub use search::{RawResult, SearchBackend, SearchProvider, select};
