use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default root of the generative language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Candidate models tried in order when `SUMMARY_MODELS` is not set.
pub const DEFAULT_SUMMARY_MODELS: [&str; 4] = [
    "gemini-1.5-pro",
    "gemini-pro",
    "gemini-1.5-flash",
    "models/gemini-pro",
];

const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the summarizer service.
///
/// Built once at startup and handed to each component explicitly; nothing in the pipeline reads
/// the environment on its own.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key attached to every call to the generative language service.
    pub gemini_api_key: String,
    /// Base URL of the generative language service.
    pub gemini_base_url: String,
    /// Ordered model identifiers tried by the summarization engine.
    pub summary_models: Vec<String>,
    /// Upper bound for a single generation attempt.
    pub model_timeout: Duration,
    /// Directory holding transient upload artifacts.
    pub upload_dir: PathBuf,
    /// Bearer credentials accepted by the static verifier.
    pub api_tokens: Vec<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let summary_models = match load_env_optional("SUMMARY_MODELS") {
            Some(value) => parse_list(&value),
            None => DEFAULT_SUMMARY_MODELS
                .iter()
                .map(|model| (*model).to_string())
                .collect(),
        };
        if summary_models.is_empty() {
            return Err(ConfigError::InvalidValue("SUMMARY_MODELS".into()));
        }

        let timeout_secs = load_env_optional("MODEL_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::InvalidValue("MODEL_TIMEOUT_SECS".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS);

        let api_tokens = parse_list(&load_env("API_TOKENS")?);
        if api_tokens.is_empty() {
            return Err(ConfigError::InvalidValue("API_TOKENS".into()));
        }

        Ok(Self {
            gemini_api_key: load_env("GEMINI_API_KEY")?,
            gemini_base_url: load_env_optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            summary_models,
            model_timeout: Duration::from_secs(timeout_secs),
            upload_dir: load_env_optional("UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            api_tokens,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the configuration from the process environment and log the non-secret parts.
///
/// Binaries load `.env` through `dotenvy` before calling this.
pub fn load_config() -> Result<Config, ConfigError> {
    let config = Config::from_env()?;
    tracing::debug!(
        base_url = %config.gemini_base_url,
        models = ?config.summary_models,
        timeout_secs = config.model_timeout.as_secs(),
        upload_dir = %config.upload_dir.display(),
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(config)
}
