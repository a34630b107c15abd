//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, redirect limit)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoaderConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::LoaderConfig;

pub const MAX_REDIRECTS: usize = 50;
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("transport.connect_timeout_ms must be greater than 0")]
    ZeroConnectTimeout,

    #[error("transport.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("transport.max_redirects must be at most {max}, got {actual}")]
    TooManyRedirects { max: usize, actual: usize },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &LoaderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.transport.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }
    if config.transport.user_agent.trim().is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }
    if config.transport.max_redirects > MAX_REDIRECTS {
        errors.push(ValidationError::TooManyRedirects {
            max: MAX_REDIRECTS,
            actual: config.transport.max_redirects,
        });
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&LoaderConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = LoaderConfig::default();
        config.transport.connect_timeout_ms = 0;
        config.transport.user_agent = "  ".into();
        config.transport.max_redirects = 99;
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroConnectTimeout));
        assert!(errors.contains(&ValidationError::EmptyUserAgent));
        assert!(errors.contains(&ValidationError::TooManyRedirects { max: 50, actual: 99 }));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("verbose".into())));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = LoaderConfig::default();
        config.observability.log_level = "WARN".into();
        assert!(validate_config(&config).is_ok());
    }
}
