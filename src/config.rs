//! Configuration management.
//!
//! Configuration can be set via environment variables:
//! - `GROQ_API_KEY` - Optional. Default API key for sessions that don't supply one.
//! - `DEFAULT_MODEL` - Optional. Chat model identifier. Defaults to `gemma2-9b-it`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_STEPS` - Optional. Maximum dispatch-loop selections per turn. Defaults to `10`.
//! - `PARSE_RETRIES` - Optional. Re-prompts allowed when a model reply cannot be
//!   parsed as a directive. Defaults to `3`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default Groq API key, used when a session does not bring its own
    pub api_key: Option<String>,

    /// Chat model identifier (Groq format)
    pub default_model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum dispatch-loop selections per turn
    pub max_steps: usize,

    /// Bounded retry budget for unparseable model directives
    pub parse_retries: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GROQ_API_KEY").ok();

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "gemma2-9b-it".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_steps = std::env::var("MAX_STEPS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_STEPS".to_string(), format!("{}", e)))?;

        let parse_retries = std::env::var("PARSE_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("PARSE_RETRIES".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            api_key,
            default_model,
            host,
            port,
            max_steps,
            parse_retries,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: Option<String>, default_model: String) -> Self {
        Self {
            api_key,
            default_model,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_steps: 10,
            parse_retries: 3,
        }
    }
}
