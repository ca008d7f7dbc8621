//! Configuration management for sitefeed using the prefer crate.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notice::NoticeConfig;
use crate::reports::SelectionLimits;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// State database filename.
    pub state_database: String,
    /// Report feed endpoint. Without one the reports pipeline degrades.
    pub feed_endpoint: Option<String>,
    /// User agent for the feed request (None = default).
    pub user_agent: Option<String>,
    /// Feed request timeout in seconds (None = wait indefinitely).
    pub request_timeout: Option<u64>,
    /// Report window and cap.
    pub limits: SelectionLimits,
    /// Update notice settings.
    pub notice: NoticeConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("sitefeed");

        Self {
            data_dir,
            state_database: "state.db".to_string(),
            feed_endpoint: None,
            user_agent: None,
            request_timeout: None,
            limits: SelectionLimits::default(),
            notice: NoticeConfig::default(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Default::default()
        }
    }

    /// Get the full path to the state database.
    pub fn state_database_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_database)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (supports `~`).
    #[serde(default)]
    pub data_dir: Option<String>,
    /// State database filename.
    #[serde(default)]
    pub state_database: Option<String>,
    /// Report feed endpoint.
    #[serde(default)]
    pub feed_endpoint: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Feed request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Drop reports older than this many days.
    #[serde(default)]
    pub expire_days: Option<u32>,
    /// Maximum number of reports rendered.
    #[serde(default)]
    pub max_reports: Option<usize>,
    /// Current update notice version tag.
    #[serde(default)]
    pub notice_version: Option<String>,
    /// Delay before the update notice appears, in milliseconds.
    #[serde(default)]
    pub notice_delay_ms: Option<u64>,
    /// Page opened by "view updates".
    #[serde(default)]
    pub updates_page: Option<String>,
    /// Page opened by "view update info".
    #[serde(default)]
    pub update_info_page: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers sitefeed config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("sitefeed").await {
            Ok(pref_config) => Config {
                data_dir: pref_config.get("data_dir").ok(),
                state_database: pref_config.get("state_database").ok(),
                feed_endpoint: pref_config.get("feed_endpoint").ok(),
                user_agent: pref_config.get("user_agent").ok(),
                request_timeout: pref_config.get("request_timeout").ok(),
                expire_days: pref_config.get("expire_days").ok(),
                max_reports: pref_config.get("max_reports").ok(),
                notice_version: pref_config.get("notice_version").ok(),
                notice_delay_ms: pref_config.get("notice_delay_ms").ok(),
                updates_page: pref_config.get("updates_page").ok(),
                update_info_page: pref_config.get("update_info_page").ok(),
            },
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref data_dir) = self.data_dir {
            let path = shellexpand::tilde(data_dir);
            settings.data_dir = PathBuf::from(path.as_ref());
        }
        if let Some(ref database) = self.state_database {
            settings.state_database = database.clone();
        }
        if let Some(ref endpoint) = self.feed_endpoint {
            settings.feed_endpoint = Some(endpoint.clone());
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = Some(timeout);
        }
        if let Some(days) = self.expire_days {
            settings.limits.expire_days = days;
        }
        if let Some(max) = self.max_reports {
            settings.limits.max_reports = max;
        }
        if let Some(ref version) = self.notice_version {
            settings.notice.version = version.clone();
        }
        if let Some(delay) = self.notice_delay_ms {
            settings.notice.delay = Duration::from_millis(delay);
        }
        if let Some(ref page) = self.updates_page {
            settings.notice.updates_page = page.clone();
        }
        if let Some(ref page) = self.update_info_page {
            settings.notice.update_info_page = page.clone();
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
