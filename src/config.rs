use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Linter configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    /// Whether the pre-execution hook lints at all
    pub enabled: bool,

    /// Also lint every nested select (derived tables, EXISTS/IN/scalar subqueries).
    /// Each disconnected query level is then warned about separately, so one
    /// statement may produce several warnings.
    pub lint_subqueries: bool,

    /// Longest query text quoted in a warning before it is truncated
    #[validate(range(
        min = 16,
        max = 65536,
        message = "Max query length must be between 16 and 65536"
    ))]
    pub max_query_length: usize,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lint_subqueries: false,
            max_query_length: 1000,
        }
    }
}

impl LinterConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            enabled: parse_env_var("CARTESIAN_LINT_ENABLED", "true")?,
            lint_subqueries: parse_env_var("CARTESIAN_LINT_SUBQUERIES", "false")?,
            max_query_length: parse_env_var("CARTESIAN_LINT_MAX_QUERY_LENGTH", "1000")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content.to_string(),
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
