// Settings store: persisted app settings, with the history limit reconciled
// against the value the main process holds.

use parking_lot::RwLock;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::error_store::{ErrorStore, with_error_handling};
use crate::bridge::Bridge;
use crate::error::StoreError;
use crate::ipc::extract_ipc_data;
use crate::models::{AppSettings, SettingsPatch};

const STORE_NAME: &str = "settings";

/// Applies the backend's answer to a requested history limit. Numbers win
/// (0 = unlimited, negatives clamp to 0); anything else keeps `candidate`.
pub fn reconcile_history_limit(candidate: u32, reply: &Value) -> u32 {
    let Some(n) = reply.as_f64() else {
        return candidate;
    };
    if n <= 0.0 {
        0
    } else if n >= u32::MAX as f64 {
        u32::MAX
    } else {
        n.trunc() as u32
    }
}

/// JSON file holding the last persisted settings.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing was ever persisted.
    pub fn load(&self) -> anyhow::Result<Option<AppSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&s)?))
    }

    pub fn save(&self, settings: &AppSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(settings)?)?;
        Ok(())
    }

    /// `save` for async callers.
    pub async fn save_async(&self, settings: &AppSettings) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(settings)?).await?;
        Ok(())
    }
}

/// Construction options for [`SettingsStore`].
pub struct SettingsStoreConfig {
    pub file: Option<SettingsFile>,
    pub default_history_limit: u32,
    /// Wait before re-fetching the history limit after rehydration.
    pub rehydrate_delay: Duration,
}

pub struct SettingsStore {
    state: RwLock<AppSettings>,
    bridge: Bridge,
    errors: Arc<ErrorStore>,
    config: SettingsStoreConfig,
}

impl SettingsStore {
    pub fn new(bridge: Bridge, errors: Arc<ErrorStore>, config: SettingsStoreConfig) -> Self {
        Self {
            state: RwLock::new(AppSettings::with_history_limit(config.default_history_limit)),
            bridge,
            errors,
            config,
        }
    }

    pub fn settings(&self) -> AppSettings {
        self.state.read().clone()
    }

    pub fn history_limit(&self) -> u32 {
        self.state.read().history_limit
    }

    fn apply(&self, f: impl FnOnce(&mut AppSettings)) -> AppSettings {
        let mut state = self.state.write();
        f(&mut state);
        state.clone()
    }

    fn write(&self, f: impl FnOnce(&mut AppSettings)) -> AppSettings {
        let next = self.apply(f);
        if let Some(file) = &self.config.file
            && let Err(e) = file.save(&next)
        {
            warn!(error = %e, path = %file.path().display(), "failed to persist settings");
        }
        next
    }

    async fn write_async(&self, f: impl FnOnce(&mut AppSettings)) -> AppSettings {
        let next = self.apply(f);
        if let Some(file) = &self.config.file
            && let Err(e) = file.save_async(&next).await
        {
            warn!(error = %e, path = %file.path().display(), "failed to persist settings");
        }
        next
    }

    pub fn update_settings(&self, patch: &SettingsPatch) -> AppSettings {
        self.write(|s| s.apply(patch))
    }

    pub fn reset_settings(&self) -> AppSettings {
        let defaults = AppSettings::with_history_limit(self.config.default_history_limit);
        self.write(|s| *s = defaults)
    }

    /// Sends `candidate` to the backend and stores the limit it settles on.
    #[instrument(skip(self), fields(store = STORE_NAME))]
    pub async fn persist_history_limit(&self, candidate: u32) -> Result<u32, StoreError> {
        with_error_handling(&self.errors, STORE_NAME, "persist_history_limit", async {
            let reply = extract_ipc_data(
                self.bridge.settings.update_history_limit(candidate).await,
            )?;
            let limit = reconcile_history_limit(candidate, &reply);
            self.write_async(|s| s.history_limit = limit).await;
            debug!(candidate, limit, "history limit persisted");
            Ok(limit)
        })
        .await
    }

    /// Pulls the backend's history limit into the store.
    pub async fn initialize_settings(&self) -> Result<AppSettings, StoreError> {
        with_error_handling(&self.errors, STORE_NAME, "initialize_settings", async {
            let reply = extract_ipc_data(self.bridge.settings.get_history_limit().await)?;
            let current = self.history_limit();
            let limit = reconcile_history_limit(current, &reply);
            Ok(self.write_async(|s| s.history_limit = limit).await)
        })
        .await
    }

    /// Settings from disk, or `None` on first run. Unreadable files count as none.
    pub fn load_persisted(&self) -> Option<AppSettings> {
        let file = self.config.file.as_ref()?;
        match file.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, path = %file.path().display(), "ignoring unreadable settings file");
                None
            }
        }
    }

    /// Restores persisted state. With prior state, re-fetches the history limit
    /// in the background after the configured delay; without it, no backend call
    /// is made and `None` is returned.
    pub fn rehydrate(self: &Arc<Self>, persisted: Option<AppSettings>) -> Option<JoinHandle<()>> {
        let Some(settings) = persisted else {
            debug!(store = STORE_NAME, "no persisted settings; skipping rehydration sync");
            return None;
        };
        *self.state.write() = settings;

        let store = Arc::clone(self);
        let delay = self.config.rehydrate_delay;
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match extract_ipc_data(store.bridge.settings.get_history_limit().await) {
                Ok(reply) => {
                    let previous = store.history_limit();
                    let limit = reconcile_history_limit(previous, &reply);
                    store.write_async(|s| s.history_limit = limit).await;
                    info!(
                        store = STORE_NAME,
                        previous, limit, "history limit reconciled after rehydration"
                    );
                }
                Err(e) => {
                    warn!(
                        store = STORE_NAME,
                        operation = "rehydrate_history_limit",
                        error = %e,
                        "failed to sync history limit after rehydration; keeping previous value"
                    );
                }
            }
        }))
    }

    /// Back to defaults without touching disk (tests).
    pub fn reset(&self) {
        *self.state.write() = AppSettings::with_history_limit(self.config.default_history_limit);
    }
}
