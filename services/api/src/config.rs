//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

use chartgenius_core::pipeline::DEFAULT_MIN_INPUT_CHARS;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// How analysis results are memoised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheMode {
    /// Never evicts. Only sensible for short-lived processes.
    Unbounded,
    /// Least-recently-used eviction; zero disables caching.
    Bounded(usize),
}

impl CacheMode {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.eq_ignore_ascii_case("unbounded") {
            return Ok(CacheMode::Unbounded);
        }
        raw.parse::<usize>().map(CacheMode::Bounded).map_err(|_| {
            ConfigError::InvalidValue(
                "ANALYSIS_CACHE_CAPACITY".to_string(),
                format!("'{}' is neither a number nor 'unbounded'", raw),
            )
        })
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Unset means documents and users live in process memory only.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub analysis_model: String,
    pub cache_mode: CacheMode,
    pub min_input_chars: usize,
    pub session_ttl_days: i64,
    pub cors_origin: String,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Model Settings ---
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        let gemini_base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());
        let analysis_model =
            std::env::var("ANALYSIS_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());

        // --- Load Pipeline Settings ---
        let cache_mode = match std::env::var("ANALYSIS_CACHE_CAPACITY") {
            Ok(raw) => CacheMode::parse(raw.trim())?,
            Err(_) => CacheMode::Bounded(DEFAULT_CACHE_CAPACITY),
        };
        let min_input_chars = parse_var("MIN_INPUT_CHARS", DEFAULT_MIN_INPUT_CHARS)?;
        let session_ttl_days = parse_var("SESSION_TTL_DAYS", 30i64)?;
        if session_ttl_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_DAYS".to_string(),
                "must be a positive number of days".to_string(),
            ));
        }

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            gemini_api_key,
            gemini_base_url,
            analysis_model,
            cache_mode,
            min_input_chars,
            session_ttl_days,
            cors_origin,
        })
    }

    /// The API key the binary cannot start without.
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))
    }
}
