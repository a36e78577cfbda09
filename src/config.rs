use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[validate(nested)]
    pub login_token: LoginTokenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Settings of the login token store as read from configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginTokenConfig {
    /// Base URL the delivery side embeds the token into
    #[validate(url)]
    pub login_url: String,
    /// Number of characters in each token (default: 32)
    #[serde(default = "default_token_length")]
    #[validate(range(min = 1, max = 1024))]
    pub token_length: usize,
    /// Token lifetime in minutes (default: 15)
    #[serde(default = "default_expiry_minutes")]
    #[validate(range(min = 1))]
    pub expiry_minutes: u64,
    /// Interval between background sweeps in seconds, 0 disables them (default: 300)
    #[serde(default = "default_reclaim_interval")]
    pub reclaim_interval_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config_rs::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("Login token length must be at least 1")]
    ZeroTokenLength,
    #[error("Login token expiry must be greater than zero")]
    ZeroExpiry,
    #[error("Login token expiry is too large")]
    ExpiryOutOfRange,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_token_length() -> usize {
    32
}

const fn default_expiry_minutes() -> u64 {
    15
}

const fn default_reclaim_interval() -> u64 {
    300 // 5 minutes
}

#[cfg(test)]
mod tests {
    use config_rs::{File, FileFormat};

    use super::*;

    fn parse(yaml: &str) -> Config {
        config_rs::Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .expect("Failed to build configuration")
            .try_deserialize()
            .expect("Failed to deserialize configuration")
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = parse(
            r#"
login_token:
  login_url: "https://example.com/login"
"#,
        );

        assert_eq!(config.tracing.log_level, "info");
        assert_eq!(config.login_token.token_length, 32);
        assert_eq!(config.login_token.expiry_minutes, 15);
        assert_eq!(config.login_token.reclaim_interval_seconds, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = parse(
            r#"
tracing:
  log_level: debug
login_token:
  login_url: "https://example.com/login"
  token_length: 48
  expiry_minutes: 5
  reclaim_interval_seconds: 0
"#,
        );

        assert_eq!(config.tracing.log_level, "debug");
        assert_eq!(config.login_token.token_length, 48);
        assert_eq!(config.login_token.expiry_minutes, 5);
        assert_eq!(config.login_token.reclaim_interval_seconds, 0);
    }

    #[test]
    fn test_zero_token_length_fails_validation() {
        let config = parse(
            r#"
login_token:
  login_url: "https://example.com/login"
  token_length: 0
"#,
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_expiry_fails_validation() {
        let config = parse(
            r#"
login_token:
  login_url: "https://example.com/login"
  expiry_minutes: 0
"#,
        );

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_login_url_must_be_a_url() {
        let config = parse(
            r#"
login_token:
  login_url: "not a url"
"#,
        );

        assert!(config.validate().is_err());
    }
}
