// Sync actions: pull authoritative state from the backend and follow its
// state-sync events.

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SYNC_STORE, SitesStore};
use crate::error::StoreError;
use crate::ipc::{extract_ipc_data, safe_extract_ipc_data};
use crate::models::{FullSyncResult, StateSyncEvent, SyncAction, SyncStatus};
use crate::stores::error_store::with_error_handling;

/// Background task applying state-sync events. Aborted on drop.
pub struct SyncSubscription {
    handle: JoinHandle<()>,
}

impl SyncSubscription {
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for SyncSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl SitesStore {
    /// Replaces local sites with the backend's list.
    pub async fn sync_sites_from_backend(&self) -> Result<(), StoreError> {
        with_error_handling(&self.errors, SYNC_STORE, "sync_sites_from_backend", async {
            let sites = extract_ipc_data(self.bridge.sites.get_sites().await)?;
            debug!(site_count = sites.len(), "sites synced from backend");
            self.set_sites(sites);
            Ok(())
        })
        .await
    }

    /// Advisory: a failed query yields [`SyncStatus::failure`], never an error.
    pub async fn get_sync_status(&self) -> SyncStatus {
        safe_extract_ipc_data(
            self.bridge.state_sync.get_sync_status().await,
            "get_sync_status",
            SyncStatus::failure(),
        )
    }

    pub async fn full_resync_sites(&self) -> Result<(), StoreError> {
        self.sync_sites_from_backend().await
    }

    /// Asks the backend for a full sync and applies the sites it returns.
    pub async fn request_full_sync(&self) -> Result<FullSyncResult, StoreError> {
        with_error_handling(&self.errors, SYNC_STORE, "request_full_sync", async {
            let result = extract_ipc_data(self.bridge.state_sync.request_full_sync().await)?;
            info!(site_count = result.site_count, "full sync completed");
            self.set_sites(result.sites.clone());
            Ok(result)
        })
        .await
    }

    pub fn apply_sync_event(&self, event: &StateSyncEvent) {
        match event.action {
            SyncAction::BulkSync => self.set_sites(event.sites.clone()),
            SyncAction::Update => {
                for site in &event.sites {
                    self.add_site(site.clone());
                }
            }
            SyncAction::Delete => {
                if let Some(identifier) = event.site_identifier.as_deref() {
                    self.remove_site(identifier);
                }
                for site in &event.sites {
                    self.remove_site(&site.identifier);
                }
            }
        }
        debug!(action = ?event.action, source = ?event.source, "state sync event applied");
    }

    /// Follows `stateSync.onStateSyncEvent`. A lagging receiver falls back to a
    /// full pull; a closed channel ends the subscription.
    pub fn subscribe_to_sync_events(self: &Arc<Self>) -> SyncSubscription {
        let mut rx = self.bridge.state_sync.subscribe();
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => store.apply_sync_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "state sync events lagged; resyncing");
                        if let Err(e) = store.sync_sites_from_backend().await {
                            warn!(error = %e, "resync after lag failed");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("state sync subscription closed");
        });
        SyncSubscription { handle }
    }
}
