//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PORTAL_API_BASE` - REST API base URL (default: the hosted backend)
//! - `PORTAL_STATE_FILE` - Where the session is persisted (default: `.school-portal/state.json`)
//! - `PORTAL_DEMO_LOGIN` - Accept the built-in demo accounts when the API is unreachable (default: true)
//! - `PORTAL_HERO_INTERVAL_MS` - Hero slide rotation period (default: 8000)
//! - `PORTAL_HTTP_TIMEOUT_SECS` - Per-request timeout (default: none)
//! - `PORTAL_LOG_JSON` - Emit JSON log lines (default: false)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://school-portal-backend-ar5x.onrender.com/api";
pub const DEFAULT_STATE_FILE: &str = ".school-portal/state.json";
const DEFAULT_HERO_INTERVAL_MS: u64 = 8000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub api: ApiConfig,
    /// File backing the session store
    pub state_file: PathBuf,
    /// Fall back to the demo accounts when login cannot reach the API
    pub demo_login: bool,
    /// Hero slider rotation period
    pub hero_interval: Duration,
    /// JSON log output
    pub log_json: bool,
}

/// REST API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_or_default(&lookup, "PORTAL_API_BASE", DEFAULT_API_BASE);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_API_BASE".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "PORTAL_API_BASE".to_string(),
                "must be a hierarchical URL".to_string(),
            ));
        }

        let timeout = get_optional(&lookup, "PORTAL_HTTP_TIMEOUT_SECS")
            .map(|value| parse_u64("PORTAL_HTTP_TIMEOUT_SECS", &value))
            .transpose()?
            .map(Duration::from_secs);

        let state_file = PathBuf::from(get_or_default(&lookup, "PORTAL_STATE_FILE", DEFAULT_STATE_FILE));
        let demo_login = get_bool(&lookup, "PORTAL_DEMO_LOGIN", true)?;
        let log_json = get_bool(&lookup, "PORTAL_LOG_JSON", false)?;

        let hero_interval = match get_optional(&lookup, "PORTAL_HERO_INTERVAL_MS") {
            Some(value) => parse_u64("PORTAL_HERO_INTERVAL_MS", &value)?,
            None => DEFAULT_HERO_INTERVAL_MS,
        };
        if hero_interval == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PORTAL_HERO_INTERVAL_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api: ApiConfig { base_url, timeout },
            state_file,
            demo_login,
            hero_interval: Duration::from_millis(hero_interval),
            log_json,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable; blank values count as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

fn get_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = get_optional(lookup, key) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{value}'"),
        )),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
