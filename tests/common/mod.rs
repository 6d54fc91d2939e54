// Shared test helpers: a recording, fault-injectable bridge backend.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uptime_watcher::bridge::{
    Bridge, DataApi, MonitoringApi, SettingsApi, SitesApi, StateSyncApi,
};
use uptime_watcher::error::BridgeError;
use uptime_watcher::ipc::{BridgeResult, IpcResponse};
use uptime_watcher::models::*;
use uptime_watcher::normalize::normalize_monitor;
use uptime_watcher::stores::{ErrorStore, SitesStore};

pub struct MockBackend {
    pub sites: Mutex<Vec<Site>>,
    calls: Mutex<Vec<String>>,
    rejections: Mutex<HashMap<&'static str, String>>,
    envelope_failures: Mutex<HashMap<&'static str, String>>,
    pub history_limit: Mutex<Value>,
    pub history_limit_reply: Mutex<Option<Value>>,
    pub sync_status: Mutex<SyncStatus>,
    pub events: broadcast::Sender<StateSyncEvent>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Self::with_sites(Vec::new())
    }

    pub fn with_sites(sites: Vec<Site>) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            sites: Mutex::new(sites),
            calls: Mutex::new(Vec::new()),
            rejections: Mutex::new(HashMap::new()),
            envelope_failures: Mutex::new(HashMap::new()),
            history_limit: Mutex::new(json!(500)),
            history_limit_reply: Mutex::new(None),
            sync_status: Mutex::new(SyncStatus {
                last_sync_at: Some(1_700_000_000_000),
                site_count: 0,
                source: SyncSource::Backend,
                synchronized: true,
            }),
            events,
        })
    }

    /// Make `method` reject at the transport level with `message`.
    pub fn reject(&self, method: &'static str, message: &str) {
        self.rejections.lock().insert(method, message.to_string());
    }

    /// Make `method` resolve with `{success: false, error: message}`.
    pub fn fail_envelope(&self, method: &'static str, message: &str) {
        self.envelope_failures
            .lock()
            .insert(method, message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.split('(').next() == Some(method))
            .count()
    }

    pub fn set_history_limit_reply(&self, reply: Value) {
        *self.history_limit_reply.lock() = Some(reply);
    }

    fn record<T>(
        &self,
        method: &'static str,
        args: &[&str],
        reply: impl FnOnce() -> Result<T, String>,
    ) -> BridgeResult<T> {
        let call = if args.is_empty() {
            method.to_string()
        } else {
            format!("{}({})", method, args.join(","))
        };
        self.calls.lock().push(call);
        if let Some(msg) = self.rejections.lock().get(method) {
            return Err(BridgeError::new(msg.clone()));
        }
        if let Some(msg) = self.envelope_failures.lock().get(method) {
            return Ok(IpcResponse::failure(msg.clone()));
        }
        Ok(IpcResponse::from_result(reply()))
    }
}

#[async_trait]
impl SitesApi for MockBackend {
    async fn add_site(&self, site: Site) -> BridgeResult<Site> {
        let id = site.identifier.clone();
        self.record("addSite", &[&id], || {
            self.sites.lock().push(site.clone());
            Ok(site)
        })
    }

    async fn get_sites(&self) -> BridgeResult<Vec<Site>> {
        self.record("getSites", &[], || Ok(self.sites.lock().clone()))
    }

    async fn update_site(&self, identifier: &str, updates: SiteUpdate) -> BridgeResult<Site> {
        self.record("updateSite", &[identifier], || {
            let mut sites = self.sites.lock();
            let site = sites
                .iter_mut()
                .find(|s| s.identifier == identifier)
                .ok_or_else(|| format!("Site not found: {}", identifier))?;
            *site = site.with_updates(&updates);
            Ok(site.clone())
        })
    }

    async fn remove_site(&self, identifier: &str) -> BridgeResult<bool> {
        self.record("removeSite", &[identifier], || {
            let mut sites = self.sites.lock();
            let before = sites.len();
            sites.retain(|s| s.identifier != identifier);
            Ok(sites.len() < before)
        })
    }
}

#[async_trait]
impl MonitoringApi for MockBackend {
    async fn start_monitoring_for_site(&self, identifier: &str) -> BridgeResult<bool> {
        self.record("startMonitoringForSite", &[identifier], || Ok(true))
    }

    async fn stop_monitoring_for_site(&self, identifier: &str) -> BridgeResult<bool> {
        self.record("stopMonitoringForSite", &[identifier], || Ok(true))
    }

    async fn start_monitoring_for_site_monitor(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> BridgeResult<bool> {
        self.record(
            "startMonitoringForSiteMonitor",
            &[identifier, monitor_id],
            || Ok(true),
        )
    }

    async fn stop_monitoring_for_site_monitor(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> BridgeResult<bool> {
        self.record(
            "stopMonitoringForSiteMonitor",
            &[identifier, monitor_id],
            || Ok(true),
        )
    }

    async fn check_site_now(&self, identifier: &str, monitor_id: &str) -> BridgeResult<bool> {
        self.record("checkSiteNow", &[identifier, monitor_id], || Ok(true))
    }
}

#[async_trait]
impl SettingsApi for MockBackend {
    async fn get_history_limit(&self) -> BridgeResult<Value> {
        self.record("getHistoryLimit", &[], || {
            Ok(self.history_limit.lock().clone())
        })
    }

    async fn update_history_limit(&self, limit: u32) -> BridgeResult<Value> {
        let arg = limit.to_string();
        self.record("updateHistoryLimit", &[&arg], || {
            let reply = self
                .history_limit_reply
                .lock()
                .clone()
                .unwrap_or_else(|| json!(limit));
            *self.history_limit.lock() = reply.clone();
            Ok(reply)
        })
    }
}

#[async_trait]
impl StateSyncApi for MockBackend {
    async fn get_sync_status(&self) -> BridgeResult<SyncStatus> {
        self.record("getSyncStatus", &[], || Ok(self.sync_status.lock().clone()))
    }

    async fn request_full_sync(&self) -> BridgeResult<FullSyncResult> {
        self.record("requestFullSync", &[], || {
            let sites = self.sites.lock().clone();
            Ok(FullSyncResult {
                completed_at: 1_700_000_000_000,
                site_count: sites.len(),
                sites,
                synchronized: true,
            })
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<StateSyncEvent> {
        self.events.subscribe()
    }
}

#[async_trait]
impl DataApi for MockBackend {
    async fn download_sqlite_backup(&self) -> BridgeResult<BackupDownload> {
        self.record("downloadSqliteBackup", &[], || {
            Ok(BackupDownload {
                buffer: Bytes::from_static(b"SQLite format 3\0"),
                file_name: "uptime-watcher-backup-1.sqlite".into(),
                metadata: BackupMetadata {
                    created_at: 1,
                    size_bytes: 16,
                    site_count: 0,
                },
            })
        })
    }
}

pub fn monitor(id: &str) -> Monitor {
    normalize_monitor(&json!({"id": id, "type": "http", "url": "https://example.com"})).unwrap()
}

pub fn site(identifier: &str, monitor_ids: &[&str]) -> Site {
    Site {
        identifier: identifier.into(),
        name: Some(format!("{} site", identifier)),
        monitoring: true,
        monitors: monitor_ids.iter().map(|id| monitor(id)).collect(),
    }
}

/// Sites store and its error store over `backend`.
pub fn sites_store(backend: Arc<MockBackend>) -> (Arc<SitesStore>, Arc<ErrorStore>) {
    let errors = Arc::new(ErrorStore::new());
    let store = Arc::new(SitesStore::new(
        Bridge::from_backend(backend),
        errors.clone(),
    ));
    (store, errors)
}
