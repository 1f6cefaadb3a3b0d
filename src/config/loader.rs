//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ObserverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ObserverConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ObserverConfig, ConfigError> {
    let config: ObserverConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::io::Write;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, ObserverConfig::default());
        assert_eq!(config.slow_query.slow_threshold_ms, 1_000);
        assert_eq!(config.slow_query.critical_threshold_ms, 5_000);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [slow_query]
            slow_threshold_ms = 250

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.slow_query.slow_threshold_ms, 250);
        assert_eq!(config.slow_query.critical_threshold_ms, 5_000);
        assert_eq!(config.slow_query.args_level, "trace");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.pool_stats.enabled);
    }

    #[test]
    fn test_type_mismatch_is_parse_error() {
        let err = parse_config("[slow_query]\nslow_threshold_ms = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_semantic_errors_are_reported() {
        let err = parse_config("[pool_stats]\ninterval_secs = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::ZeroPoolStatsInterval]);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[slow_query]\ncritical_threshold_ms = 2000").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.slow_query.critical_threshold_ms, 2_000);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/query-observer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
