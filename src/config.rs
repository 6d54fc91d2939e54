use serde::Deserialize;

use crate::models::AppSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub settings: SettingsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file of the local backend; ":memory:" for a throwaway database.
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// JSON file the settings store persists to.
    pub path: String,
    /// Delay before re-fetching the history limit after rehydration.
    #[serde(default = "default_rehydrate_delay_ms")]
    pub rehydrate_delay_ms: u64,
    #[serde(default = "default_history_limit")]
    pub default_history_limit: u32,
}

fn default_rehydrate_delay_ms() -> u64 {
    100
}

fn default_history_limit() -> u32 {
    AppSettings::DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Capacity of the state-sync broadcast channel (slow subscribers lag and resync).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_event_channel_capacity() -> usize {
    64
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var("UPTIME_WATCHER_CONFIG").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_connections > 0,
            "database.max_connections must be > 0, got {}",
            self.database.max_connections
        );
        anyhow::ensure!(
            !self.settings.path.is_empty(),
            "settings.path must be non-empty"
        );
        anyhow::ensure!(
            self.sync.event_channel_capacity > 0,
            "sync.event_channel_capacity must be > 0, got {}",
            self.sync.event_channel_capacity
        );
        Ok(())
    }
}
