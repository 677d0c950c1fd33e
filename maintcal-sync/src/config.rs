use chrono::{Duration, NaiveDate, Utc};
use ::config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::integrations::google_calendar::GOOGLE_CALENDAR_API_BASE;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub mailbox: MailboxConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MailboxConfig {
    pub address: String,
    pub port: u16,
    pub username: Option<String>,
    pub folder: String,
    /// How far back `run` and `list` look when `--since` is not given
    pub lookback_days: u32,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            address: "imap.gmail.com".to_string(),
            port: 993,
            username: None,
            folder: "INBOX".to_string(),
            lookback_days: 30,
        }
    }
}

impl MailboxConfig {
    /// Start of the lookback window, clamped to the earliest representable date.
    pub fn default_since(&self) -> NaiveDate {
        Utc::now()
            .date_naive()
            .checked_sub_signed(Duration::days(i64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PatternsConfig {
    pub directory: PathBuf,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            directory: get_app_dir().join("notification_patterns"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CalendarConfig {
    pub calendar_id: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            client_id: None,
            client_secret: None,
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub record_schedule: bool,
    pub schedule_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_schedule_path(&self) -> PathBuf {
        match &self.schedule_path {
            Some(path) => path.clone(),
            None => dirs::data_local_dir()
                .map(|dir| dir.join("maintcal"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("schedule.db"),
        }
    }
}

const DEFAULT_CONFIG: &str = r#"
[mailbox]
address = "imap.gmail.com"
port = 993
# username = "noc@example.com"
folder = "INBOX"
lookback_days = 30

[patterns]
# directory = "/etc/maintcal/notification_patterns"

[calendar]
calendar_id = "primary"
# Google Cloud Console OAuth2 client for the Calendar API
# client_id = "YOUR_CLIENT_ID.apps.googleusercontent.com"
# client_secret = "YOUR_CLIENT_SECRET"

[storage]
record_schedule = false
# schedule_path = "/var/lib/maintcal/schedule.db"
"#;

/// Environment variables that override file settings.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("mailbox.address", "IMAP_ADDRESS"),
    ("mailbox.folder", "IMAP_FOLDER"),
    ("mailbox.username", "IMAP_USERNAME"),
    ("patterns.directory", "NOTIFICATION_PATTERNS_FOLDER"),
];

impl SyncConfig {
    /// Loads the configuration file, writing a default one first if the
    /// file does not exist yet.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
        }

        let config = Self::load_from(&config_path, |key| std::env::var(key).ok())?;

        Ok((config, config_path))
    }

    /// Reads `path` and applies environment overrides looked up through `env`.
    pub fn load_from<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().add_source(File::from(path.to_path_buf()));

        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, env(var).filter(|v| !v.is_empty()))?;
        }

        builder.build()?.try_deserialize()
    }
}

fn get_app_dir() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("maintcal")
    } else {
        PathBuf::from(".")
    }
}

pub fn get_config_path() -> PathBuf {
    get_app_dir().join("config.toml")
}
