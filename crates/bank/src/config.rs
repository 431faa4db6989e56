use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds the bank provider configuration loaded from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct BankConfig {
    /// Directory of `<exercise_type>.json` files. `None` selects the bundled bank.
    pub bank_path: Option<PathBuf>,
    pub case_sensitive: bool,
    /// Level passed to `telemetry::init_from`.
    pub log_level: Level,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            bank_path: None,
            case_sensitive: false,
            log_level: Level::INFO,
        }
    }
}

impl BankConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bank_path = std::env::var("EXERCISE_BANK_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let case_sensitive = match std::env::var("ANSWER_CASE_SENSITIVE") {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "ANSWER_CASE_SENSITIVE".to_string(),
                    format!("'{}' is not a boolean", value),
                )
            })?,
            Err(_) => false,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bank_path,
            case_sensitive,
            log_level,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
