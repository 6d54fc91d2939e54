// Typed IPC bridge to the main process, one trait per namespace.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::ipc::BridgeResult;
use crate::models::{
    BackupDownload, FullSyncResult, Site, SiteUpdate, StateSyncEvent, SyncStatus,
};

/// `sites.*`
#[async_trait]
pub trait SitesApi: Send + Sync {
    async fn add_site(&self, site: Site) -> BridgeResult<Site>;
    async fn get_sites(&self) -> BridgeResult<Vec<Site>>;
    async fn update_site(&self, identifier: &str, updates: SiteUpdate) -> BridgeResult<Site>;
    async fn remove_site(&self, identifier: &str) -> BridgeResult<bool>;
}

/// `monitoring.*`
#[async_trait]
pub trait MonitoringApi: Send + Sync {
    async fn start_monitoring_for_site(&self, identifier: &str) -> BridgeResult<bool>;
    async fn stop_monitoring_for_site(&self, identifier: &str) -> BridgeResult<bool>;
    async fn start_monitoring_for_site_monitor(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> BridgeResult<bool>;
    async fn stop_monitoring_for_site_monitor(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> BridgeResult<bool>;
    async fn check_site_now(&self, identifier: &str, monitor_id: &str) -> BridgeResult<bool>;
}

/// `settings.*`. History-limit replies are raw JSON because the main process
/// may answer with anything; callers reconcile the value.
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn get_history_limit(&self) -> BridgeResult<serde_json::Value>;
    async fn update_history_limit(&self, limit: u32) -> BridgeResult<serde_json::Value>;
}

/// `stateSync.*`
#[async_trait]
pub trait StateSyncApi: Send + Sync {
    async fn get_sync_status(&self) -> BridgeResult<SyncStatus>;
    async fn request_full_sync(&self) -> BridgeResult<FullSyncResult>;
    /// `onStateSyncEvent`: a fresh receiver for every subscriber.
    fn subscribe(&self) -> broadcast::Receiver<StateSyncEvent>;
}

/// `data.*`
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn download_sqlite_backup(&self) -> BridgeResult<BackupDownload>;
}

/// The bridge object handed to stores.
#[derive(Clone)]
pub struct Bridge {
    pub sites: Arc<dyn SitesApi>,
    pub monitoring: Arc<dyn MonitoringApi>,
    pub settings: Arc<dyn SettingsApi>,
    pub state_sync: Arc<dyn StateSyncApi>,
    pub data: Arc<dyn DataApi>,
}

impl Bridge {
    /// Every namespace served by one backend object.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: SitesApi + MonitoringApi + SettingsApi + StateSyncApi + DataApi + 'static,
    {
        Self {
            sites: backend.clone(),
            monitoring: backend.clone(),
            settings: backend.clone(),
            state_sync: backend.clone(),
            data: backend,
        }
    }
}
