//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.
//! Provider credentials are not checked here; that happens when the
//! provider is selected.

use crate::config::AppConfig;
use crate::model::MAX_RESULTS_LIMIT;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

fn check_timeout(field: &str, timeout_ms: u64) -> Result<(), ConfigError> {
    if timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must not exceed 5 minutes (300000ms)".into() });
    }
    Ok(())
}

fn check_ceiling(field: &str, max_results: usize) -> Result<(), ConfigError> {
    if max_results == 0 {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be greater than 0".into() });
    }
    if max_results > MAX_RESULTS_LIMIT {
        tracing::warn!(field, max_results, limit = MAX_RESULTS_LIMIT, "provider ceiling above the query limit has no effect");
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_content_bytes` is 0 or exceeds 50MB
    /// - any timeout is less than 100ms or exceeds 5 minutes
    /// - `max_redirects` exceeds 20
    /// - `user_agent` is empty
    /// - a provider ceiling is 0
    /// - the allowlist or noise lists contain blank entries
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_content_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_content_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_content_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid {
                field: "max_content_bytes".into(),
                reason: "must not exceed 50MB".into(),
            });
        }

        check_timeout("fetch_timeout_ms", self.fetch_timeout_ms)?;

        if self.max_redirects > 20 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 20".into() });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        let search = &self.search;
        check_timeout("search.searxng.timeout_ms", search.searxng.timeout_ms)?;
        check_timeout("search.duckduckgo.timeout_ms", search.duckduckgo.timeout_ms)?;
        check_timeout("search.brave.timeout_ms", search.brave.timeout_ms)?;
        check_ceiling("search.searxng.max_results", search.searxng.max_results)?;
        check_ceiling("search.duckduckgo.max_results", search.duckduckgo.max_results)?;
        check_ceiling("search.brave.max_results", search.brave.max_results)?;

        let lists = [
            ("content_types.html", &self.content_types.html),
            ("content_types.plain_text", &self.content_types.plain_text),
            ("content_types.json", &self.content_types.json),
            ("noise.tags", &self.noise.tags),
            ("noise.tokens", &self.noise.tokens),
        ];
        for (field, entries) in lists {
            if entries.iter().any(|entry| entry.trim().is_empty()) {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must not contain blank entries".into() });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_content_bytes_zero() {
        let config = AppConfig { max_content_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_content_bytes"));
    }

    #[test]
    fn test_validate_max_content_bytes_exceeds_limit() {
        let config = AppConfig { max_content_bytes: 51 * 1024 * 1024, ..Default::default() }; // 51MB
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_content_bytes"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { fetch_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { fetch_timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_provider_timeout() {
        let mut config = AppConfig::default();
        config.search.brave.timeout_ms = 10;
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search.brave.timeout_ms"));
    }

    #[test]
    fn test_validate_provider_ceiling_zero() {
        let mut config = AppConfig::default();
        config.search.searxng.max_results = 0;
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search.searxng.max_results"));
    }

    #[test]
    fn test_validate_provider_ceiling_above_limit_only_warns() {
        let mut config = AppConfig::default();
        config.search.duckduckgo.max_results = 25;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_too_many_redirects() {
        let config = AppConfig { max_redirects: 21, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_redirects"));
    }

    #[test]
    fn test_validate_blank_noise_token() {
        let mut config = AppConfig::default();
        config.noise.tokens.push("  ".into());
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "noise.tokens"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { max_content_bytes: 1, fetch_timeout_ms: 100, max_redirects: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config = AppConfig {
            max_content_bytes: 50 * 1024 * 1024,
            fetch_timeout_ms: 300_000,
            max_redirects: 20,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
