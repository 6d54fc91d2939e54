// Explicit application context: owns every store. Built once at startup and
// passed to whoever needs it.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::bridge::Bridge;
use crate::config::AppConfig;
use crate::stores::settings::SettingsStoreConfig;
use crate::stores::{ErrorStore, SettingsFile, SettingsStore, SitesStore};

pub struct AppContext {
    pub errors: Arc<ErrorStore>,
    pub settings: Arc<SettingsStore>,
    pub sites: Arc<SitesStore>,
}

impl AppContext {
    /// Builds the stores without touching disk or the backend.
    pub fn new(bridge: Bridge, settings_config: SettingsStoreConfig) -> Self {
        let errors = Arc::new(ErrorStore::new());
        let settings = Arc::new(SettingsStore::new(
            bridge.clone(),
            errors.clone(),
            settings_config,
        ));
        let sites = Arc::new(SitesStore::new(bridge, errors.clone()));
        Self {
            errors,
            settings,
            sites,
        }
    }

    /// Builds the stores from config and rehydrates persisted settings. The
    /// returned handle is the background history-limit reconciliation, if any.
    pub fn init(config: &AppConfig, bridge: Bridge) -> (Self, Option<JoinHandle<()>>) {
        let ctx = Self::new(
            bridge,
            SettingsStoreConfig {
                file: Some(SettingsFile::new(&config.settings.path)),
                default_history_limit: config.settings.default_history_limit,
                rehydrate_delay: Duration::from_millis(config.settings.rehydrate_delay_ms),
            },
        );
        let persisted = ctx.settings.load_persisted();
        let rehydration = ctx.settings.rehydrate(persisted);
        (ctx, rehydration)
    }

    /// Restores every store to its initial state.
    pub fn reset(&self) {
        self.errors.clear_all_errors();
        self.settings.reset();
        self.sites.reset();
    }
}
