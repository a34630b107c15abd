//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::LoaderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<LoaderConfig, ConfigError> {
    let config: LoaderConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoaderConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/fetch-loader.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_config("[transport\nuser_agent = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error: "));
    }

    #[test]
    fn test_error_sources() {
        use std::error::Error as _;

        let io = load_config(Path::new("/nonexistent/fetch-loader.toml")).unwrap_err();
        assert!(io.source().unwrap().is::<std::io::Error>());

        let parse = parse_config("[transport\n").unwrap_err();
        assert!(parse.source().unwrap().is::<toml::de::Error>());

        let invalid = parse_config("[transport]\nmax_redirects = 99\n").unwrap_err();
        assert!(invalid.source().is_none());
    }

    #[test]
    fn test_validation_errors_joined() {
        let err = parse_config(
            r#"
            [transport]
            connect_timeout_ms = 0
            user_agent = ""
            "#,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation failed: transport.connect_timeout_ms must be greater than 0, \
             transport.user_agent must not be empty"
        );
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("fetch-loader-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[defaults]\ntimings = true\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.defaults.timings);

        let _ = fs::remove_file(&path);
    }
}
