//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! Telegram API constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_bot_token: String,

    /// Path to the knowledge base JSON file
    #[serde(default = "default_knowledge_base_path")]
    pub knowledge_base_path: PathBuf,

    /// Path to the statistics JSON file
    #[serde(default = "default_statistics_path")]
    pub statistics_path: PathBuf,

    /// Idle time after which a chat's UI state is forgotten
    #[serde(default = "default_ui_state_ttl_secs")]
    pub ui_state_ttl_secs: u64,

    /// Maximum number of chats tracked at once
    #[serde(default = "default_ui_state_max_chats")]
    pub ui_state_max_chats: u64,
}

fn default_knowledge_base_path() -> PathBuf {
    PathBuf::from("knowledge_base.json")
}

fn default_statistics_path() -> PathBuf {
    PathBuf::from("statistics.json")
}

const fn default_ui_state_ttl_secs() -> u64 {
    UI_STATE_TTL_SECS
}

const fn default_ui_state_max_chats() -> u64 {
    UI_STATE_MAX_CHATS
}

/// Builds the layered configuration source used by [`Settings::new`].
///
/// # Errors
///
/// Returns a `ConfigError` if any present source cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__STATISTICS_PATH=/data/stats.json`
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Plain UPPER_SNAKE_CASE variables, empty values treated as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kb_navigator::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or the token is missing.
    pub fn new() -> Result<Self, ConfigError> {
        let settings: Self = build_config()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_bot_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "TELEGRAM_BOT_TOKEN must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Idle TTL of per-chat UI state
    #[must_use]
    pub const fn ui_state_ttl(&self) -> Duration {
        Duration::from_secs(self.ui_state_ttl_secs)
    }
}

// UI state configuration
/// Default idle TTL for per-chat UI state (24 hours)
pub const UI_STATE_TTL_SECS: u64 = 86_400;
/// Default capacity of the UI state cache
pub const UI_STATE_MAX_CHATS: u64 = 100_000;

// Telegram API retry configuration
/// Maximum retries for transient Telegram API failures
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff between retries
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 200;
/// Upper bound for a single backoff delay
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 5_000;

#[cfg(test)]
mod tests {
    use super::*;

    fn from_overrides(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value)?;
        }
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    #[test]
    fn test_defaults_applied() -> Result<(), Box<dyn std::error::Error>> {
        let settings = from_overrides(&[("telegram_bot_token", "dummy_token")])?;

        assert_eq!(settings.telegram_bot_token, "dummy_token");
        assert_eq!(
            settings.knowledge_base_path,
            PathBuf::from("knowledge_base.json")
        );
        assert_eq!(settings.statistics_path, PathBuf::from("statistics.json"));
        assert_eq!(settings.ui_state_ttl(), Duration::from_secs(86_400));
        assert_eq!(settings.ui_state_max_chats, UI_STATE_MAX_CHATS);
        Ok(())
    }

    #[test]
    fn test_paths_overridden() -> Result<(), Box<dyn std::error::Error>> {
        let settings = from_overrides(&[
            ("telegram_bot_token", "dummy_token"),
            ("knowledge_base_path", "/data/kb.json"),
            ("statistics_path", "/data/stats.json"),
            ("ui_state_ttl_secs", "60"),
        ])?;

        assert_eq!(settings.knowledge_base_path, PathBuf::from("/data/kb.json"));
        assert_eq!(settings.statistics_path, PathBuf::from("/data/stats.json"));
        assert_eq!(settings.ui_state_ttl(), Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn test_missing_token_rejected() {
        assert!(from_overrides(&[]).is_err());
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(from_overrides(&[("telegram_bot_token", "   ")]).is_err());
    }
}
