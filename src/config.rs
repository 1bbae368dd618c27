//! Configuration: required credentials, the startup gate and tunables.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// The three values the watcher cannot run without.
///
/// An empty string stands for an unset variable.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

// Tokens must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// Values are trimmed; whitespace-only counts as unset.
    pub fn from_env() -> Self {
        Self {
            practicum_token: env_value(PRACTICUM_TOKEN),
            telegram_token: env_value(TELEGRAM_TOKEN),
            telegram_chat_id: env_value(TELEGRAM_CHAT_ID),
        }
    }

    /// Names of the environment variables that are missing, in a fixed order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn env_value(key: &str) -> String {
    std::env::var(key)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Gate the poll loop on complete credentials.
///
/// Emits one critical entry per missing variable and returns `false` if
/// any is missing. The caller must exit instead of starting the loop.
pub fn check_credentials(credentials: &Credentials) -> bool {
    let missing = credentials.missing();
    if missing.is_empty() {
        tracing::info!("All required environment variables are set");
        return true;
    }

    for name in missing {
        tracing::error!(
            severity = "critical",
            variable = name,
            "Required environment variable \"{name}\" is missing. The program is stopped."
        );
    }
    false
}

/// Load `KEY=value` pairs from an env file into the process environment.
///
/// Variables already present in the environment win. Returns `Ok(false)`
/// when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Default location of the env file: `.env` in the working directory.
pub fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

/// Runtime tunables for the watcher.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub endpoint: String,
    pub telegram_api: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Initial `from_date`; `None` means the time the loop starts.
    pub from_date: Option<i64>,
    /// Stop after this many cycles; `None` runs until interrupted.
    pub max_cycles: Option<u64>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            telegram_api: DEFAULT_TELEGRAM_API.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS),
            from_date: None,
            max_cycles: None,
        }
    }
}
