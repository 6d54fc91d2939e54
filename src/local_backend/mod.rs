// In-process backend serving every bridge namespace from SQLite. Replies are
// enveloped the way main-process IPC handlers reply, and every change is
// broadcast as a state-sync event.

mod repo;

pub use repo::SiteRepo;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

use crate::bridge::{DataApi, MonitoringApi, SettingsApi, SitesApi, StateSyncApi};
use crate::ipc::{BridgeResult, IpcResponse};
use crate::models::{
    BackupDownload, BackupMetadata, FullSyncResult, Monitor, MonitorStatus, Site, SiteUpdate,
    StateSyncEvent, SyncAction, SyncSource, SyncStatus,
};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Keeps the newest `limit` history entries of every monitor (0 = unlimited).
fn trim_history(site: &mut Site, limit: u32) -> bool {
    if limit == 0 {
        return false;
    }
    let mut changed = false;
    for m in &mut site.monitors {
        if m.history.len() > limit as usize {
            m.history.sort_by_key(|h| std::cmp::Reverse(h.timestamp));
            m.history.truncate(limit as usize);
            changed = true;
        }
    }
    changed
}

/// Starting resumes a paused monitor as pending; stopping pauses it. Any other
/// status is left to the next check.
fn set_monitoring(monitor: &mut Monitor, monitoring: bool) {
    monitor.monitoring = monitoring;
    let next = if monitoring {
        MonitorStatus::Pending
    } else {
        MonitorStatus::Paused
    };
    if monitor.status.can_transition_to(next) {
        monitor.status = next;
    }
}

pub struct LocalBackend {
    repo: SiteRepo,
    events: broadcast::Sender<StateSyncEvent>,
    default_history_limit: u32,
    /// Epoch ms of the last full read by a client; 0 = never.
    last_sync_at: AtomicI64,
}

impl LocalBackend {
    /// Opens (and initializes) the database at `path`.
    pub async fn open(
        path: &str,
        max_connections: u32,
        event_channel_capacity: usize,
        default_history_limit: u32,
    ) -> anyhow::Result<Self> {
        let repo = SiteRepo::connect(path, max_connections).await?;
        repo.init().await?;
        let (events, _) = broadcast::channel(event_channel_capacity);
        Ok(Self {
            repo,
            events,
            default_history_limit,
            last_sync_at: AtomicI64::new(0),
        })
    }

    fn emit(&self, action: SyncAction, sites: Vec<Site>, site_identifier: Option<String>) {
        let event = StateSyncEvent {
            action,
            sites,
            site_identifier,
            source: SyncSource::Backend,
            timestamp: now_ms(),
        };
        if self.events.send(event).is_err() {
            debug!(action = ?action, "no state sync subscribers");
        }
    }

    async fn require_site(&self, identifier: &str) -> anyhow::Result<Site> {
        self.repo
            .get_site(identifier)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Site not found: {}", identifier))
    }

    async fn save_and_emit(&self, site: Site) -> anyhow::Result<Site> {
        self.repo.upsert_site(&site).await?;
        self.emit(SyncAction::Update, vec![site.clone()], None);
        Ok(site)
    }

    async fn add_site_inner(&self, site: Site) -> anyhow::Result<Site> {
        anyhow::ensure!(
            !site.identifier.trim().is_empty(),
            "Site identifier must be non-empty"
        );
        anyhow::ensure!(
            self.repo.get_site(&site.identifier).await?.is_none(),
            "Site already exists: {}",
            site.identifier
        );
        self.save_and_emit(site).await
    }

    async fn update_site_inner(&self, identifier: &str, updates: SiteUpdate) -> anyhow::Result<Site> {
        let site = self.require_site(identifier).await?;
        self.save_and_emit(site.with_updates(&updates)).await
    }

    async fn remove_site_inner(&self, identifier: &str) -> anyhow::Result<bool> {
        let removed = self.repo.delete_site(identifier).await?;
        if removed {
            self.emit(SyncAction::Delete, Vec::new(), Some(identifier.to_string()));
        }
        Ok(removed)
    }

    async fn list_sites_inner(&self) -> anyhow::Result<Vec<Site>> {
        let sites = self.repo.list_sites().await?;
        self.last_sync_at.store(now_ms(), Ordering::Relaxed);
        Ok(sites)
    }

    async fn set_site_monitoring(&self, identifier: &str, monitoring: bool) -> anyhow::Result<bool> {
        let mut site = self.require_site(identifier).await?;
        site.monitoring = monitoring;
        for m in &mut site.monitors {
            set_monitoring(m, monitoring);
        }
        self.save_and_emit(site).await?;
        Ok(true)
    }

    async fn set_monitor_monitoring(
        &self,
        identifier: &str,
        monitor_id: &str,
        monitoring: bool,
    ) -> anyhow::Result<bool> {
        let mut site = self.require_site(identifier).await?;
        let monitor = site
            .monitors
            .iter_mut()
            .find(|m| m.id == monitor_id)
            .ok_or_else(|| anyhow::anyhow!("Monitor not found: {}", monitor_id))?;
        set_monitoring(monitor, monitoring);
        self.save_and_emit(site).await?;
        Ok(true)
    }

    /// No probe engine runs in-process; a check only stamps `lastChecked`.
    async fn check_now_inner(&self, identifier: &str, monitor_id: &str) -> anyhow::Result<bool> {
        let mut site = self.require_site(identifier).await?;
        let monitor = site
            .monitors
            .iter_mut()
            .find(|m| m.id == monitor_id)
            .ok_or_else(|| anyhow::anyhow!("Monitor not found: {}", monitor_id))?;
        monitor.last_checked = Some(now_ms());
        self.save_and_emit(site).await?;
        Ok(true)
    }

    async fn history_limit_inner(&self) -> anyhow::Result<Value> {
        let limit = self
            .repo
            .history_limit()
            .await?
            .unwrap_or(self.default_history_limit);
        Ok(Value::from(limit))
    }

    async fn update_history_limit_inner(&self, limit: u32) -> anyhow::Result<Value> {
        self.repo.set_history_limit(limit).await?;
        let mut trimmed = Vec::new();
        for mut site in self.repo.list_sites().await? {
            if trim_history(&mut site, limit) {
                self.repo.upsert_site(&site).await?;
                trimmed.push(site);
            }
        }
        if !trimmed.is_empty() {
            self.emit(SyncAction::Update, trimmed, None);
        }
        Ok(Value::from(limit))
    }

    async fn sync_status_inner(&self) -> anyhow::Result<SyncStatus> {
        let last = self.last_sync_at.load(Ordering::Relaxed);
        Ok(SyncStatus {
            last_sync_at: (last > 0).then_some(last),
            site_count: self.repo.count_sites().await?,
            source: SyncSource::Backend,
            synchronized: true,
        })
    }

    async fn full_sync_inner(&self) -> anyhow::Result<FullSyncResult> {
        let sites = self.list_sites_inner().await?;
        self.emit(SyncAction::BulkSync, sites.clone(), None);
        Ok(FullSyncResult {
            completed_at: now_ms(),
            site_count: sites.len(),
            sites,
            synchronized: true,
        })
    }

    async fn backup_inner(&self) -> anyhow::Result<BackupDownload> {
        let created_at = now_ms();
        let tmp = std::env::temp_dir().join(format!(
            "uptime-watcher-backup-{}.sqlite",
            uuid::Uuid::new_v4()
        ));
        self.repo.vacuum_into(&tmp).await?;
        let read = tokio::fs::read(&tmp).await;
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            debug!(error = %e, path = %tmp.display(), "failed to remove backup temp file");
        }
        let buffer = Bytes::from(read?);
        Ok(BackupDownload {
            file_name: format!("uptime-watcher-backup-{}.sqlite", created_at),
            metadata: BackupMetadata {
                created_at,
                size_bytes: buffer.len() as u64,
                site_count: self.repo.count_sites().await?,
            },
            buffer,
        })
    }
}

#[async_trait]
impl SitesApi for LocalBackend {
    async fn add_site(&self, site: Site) -> BridgeResult<Site> {
        Ok(IpcResponse::from_result(self.add_site_inner(site).await))
    }

    async fn get_sites(&self) -> BridgeResult<Vec<Site>> {
        Ok(IpcResponse::from_result(self.list_sites_inner().await))
    }

    async fn update_site(&self, identifier: &str, updates: SiteUpdate) -> BridgeResult<Site> {
        Ok(IpcResponse::from_result(
            self.update_site_inner(identifier, updates).await,
        ))
    }

    async fn remove_site(&self, identifier: &str) -> BridgeResult<bool> {
        Ok(IpcResponse::from_result(self.remove_site_inner(identifier).await))
    }
}

#[async_trait]
impl MonitoringApi for LocalBackend {
    async fn start_monitoring_for_site(&self, identifier: &str) -> BridgeResult<bool> {
        Ok(IpcResponse::from_result(
            self.set_site_monitoring(identifier, true).await,
        ))
    }

    async fn stop_monitoring_for_site(&self, identifier: &str) -> BridgeResult<bool> {
        Ok(IpcResponse::from_result(
            self.set_site_monitoring(identifier, false).await,
        ))
    }

    async fn start_monitoring_for_site_monitor(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> BridgeResult<bool> {
        Ok(IpcResponse::from_result(
            self.set_monitor_monitoring(identifier, monitor_id, true).await,
        ))
    }

    async fn stop_monitoring_for_site_monitor(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> BridgeResult<bool> {
        Ok(IpcResponse::from_result(
            self.set_monitor_monitoring(identifier, monitor_id, false).await,
        ))
    }

    async fn check_site_now(&self, identifier: &str, monitor_id: &str) -> BridgeResult<bool> {
        Ok(IpcResponse::from_result(
            self.check_now_inner(identifier, monitor_id).await,
        ))
    }
}

#[async_trait]
impl SettingsApi for LocalBackend {
    async fn get_history_limit(&self) -> BridgeResult<Value> {
        Ok(IpcResponse::from_result(self.history_limit_inner().await))
    }

    async fn update_history_limit(&self, limit: u32) -> BridgeResult<Value> {
        Ok(IpcResponse::from_result(
            self.update_history_limit_inner(limit).await,
        ))
    }
}

#[async_trait]
impl StateSyncApi for LocalBackend {
    async fn get_sync_status(&self) -> BridgeResult<SyncStatus> {
        Ok(IpcResponse::from_result(self.sync_status_inner().await))
    }

    async fn request_full_sync(&self) -> BridgeResult<FullSyncResult> {
        Ok(IpcResponse::from_result(self.full_sync_inner().await))
    }

    fn subscribe(&self) -> broadcast::Receiver<StateSyncEvent> {
        self.events.subscribe()
    }
}

#[async_trait]
impl DataApi for LocalBackend {
    async fn download_sqlite_backup(&self) -> BridgeResult<BackupDownload> {
        Ok(IpcResponse::from_result(self.backup_inner().await))
    }
}
