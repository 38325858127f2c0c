//! Application configuration structures.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::WatchList;
use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bulletin source and HTTP behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Streets to flag in the report
    #[serde(default)]
    pub watch: WatchConfig,

    /// Report rendering
    #[serde(default)]
    pub report: ReportConfig,

    /// Telegram delivery
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Repeated runs for the `watch` command
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error, so a typo
    /// never silently drops the watch list or the Telegram settings.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.base_url).map_err(|e| {
            AppError::validation(format!(
                "source.base_url '{}' is not a valid URL: {e}",
                self.source.base_url
            ))
        })?;
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.schedule.interval_secs == 0 {
            return Err(AppError::validation("schedule.interval_secs must be > 0"));
        }
        if self.watch.streets.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::validation(
                "watch.streets contains a blank entry, which would match every street",
            ));
        }
        let has_token = !self.telegram.token.trim().is_empty();
        let has_chat = !self.telegram.chat_id.trim().is_empty();
        if has_token != has_chat {
            return Err(AppError::validation(
                "telegram.token and telegram.chat_id must be set together",
            ));
        }
        Ok(())
    }

    /// The configured watch list.
    pub fn watch_list(&self) -> WatchList {
        WatchList::new(self.watch.streets.iter().cloned())
    }
}

/// Where the bulletin lives and how to fetch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Site root used for the search request
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Street-name substrings to flag
    #[serde(default)]
    pub streets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Title shown inside the banner
    #[serde(default = "defaults::title")]
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: defaults::title(),
        }
    }
}

/// Telegram Bot API settings. Delivery is off unless both token and chat id are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub chat_id: String,

    #[serde(default = "defaults::telegram_api")]
    pub api_base: String,
}

impl TelegramConfig {
    pub fn is_enabled(&self) -> bool {
        !self.token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: String::new(),
            api_base: defaults::telegram_api(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between runs
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter (overridden by RUST_LOG)
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://www.ahoraleon.com".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; speedcams/0.1)".into()
    }
    pub fn title() -> String {
        "LEÓN SPEEDCAMS".into()
    }
    pub fn telegram_api() -> String {
        "https://api.telegram.org".into()
    }
    pub fn interval() -> u64 {
        24 * 60 * 60
    }
    pub fn level() -> String {
        "info".into()
    }
}
