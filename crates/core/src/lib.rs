//! Core types and shared functionality for surf.
//!
//! This crate provides:
//! - Request-scoped value types (`Document`, `SearchQuery`, `SearchResult`)
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod model;

pub use config::{AppConfig, ConfigError, ProviderKind};
pub use error::{Error, FetchError, SearchError};
pub use model::{ContentKind, Document, SearchQuery, SearchResult, TimeRange};
