//! Environment-driven configuration of the console.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Directory used when `USERDESK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://reqres.in/api";

const API_URL_VAR: &str = "USERDESK_API_URL";
const DATA_DIR_VAR: &str = "USERDESK_DATA_DIR";
const TIMEOUT_VAR: &str = "USERDESK_TIMEOUT_SECS";

/// Runtime configuration of the console client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the directory API, without trailing slash.
    pub api_url: String,
    /// Directory holding `session.db`.
    pub data_dir: PathBuf,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ConsoleConfig {
    /// Build a config for `api_url`, keeping the session under `data_dir`.
    pub fn new(api_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            data_dir: data_dir.into(),
            timeout: None,
        }
    }

    /// Read configuration from `USERDESK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = match lookup(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        let timeout = match lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    key: TIMEOUT_VAR,
                    message: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        key: TIMEOUT_VAR,
                        message: "must be greater than zero".to_string(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_url: normalize_url(api_url),
            data_dir,
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Path of the SQLite file holding the session token.
    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join("session.db")
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `{app_data_dir}/userdesk`, falling back to `~/.local/share/userdesk`.
fn default_data_dir() -> Option<PathBuf> {
    let mut dir = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    })?;
    dir.push("userdesk");
    Some(dir)
}
