// Operations actions: site and monitor mutations backed by the main process.
// Each resyncs from the backend after the backend accepts the change, and
// backend failures are returned to the caller unchanged.

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{OPERATIONS_STORE, SitesStore};
use crate::error::StoreError;
use crate::ipc::extract_ipc_data;
use crate::models::{BackupDownload, Monitor, Site, SiteUpdate};
use crate::normalize::create_default_monitor;
use crate::site_ops::{self, MonitorPatch};
use crate::stores::error_store::with_error_handling;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeSitesResult {
    pub success: bool,
    pub sites_loaded: usize,
    pub message: String,
}

impl SitesStore {
    fn require_site(&self, identifier: &str) -> Result<Site, StoreError> {
        self.site(identifier)
            .ok_or_else(|| StoreError::SiteNotFound(identifier.to_string()))
    }

    /// Sends the site's new monitor list to the backend, applies the stored
    /// site it answers with, then resyncs. Callers hold the site's lock.
    async fn push_monitors(&self, site: &Site) -> Result<(), StoreError> {
        let stored = extract_ipc_data(
            self.bridge
                .sites
                .update_site(&site.identifier, SiteUpdate::monitors(site.monitors.clone()))
                .await,
        )?;
        if !self.update_site_locally(stored) {
            debug!(identifier = %site.identifier, "updated site missing locally");
        }
        self.sync_sites_from_backend().await
    }

    async fn update_monitor(
        &self,
        operation: &'static str,
        site_identifier: &str,
        monitor_id: &str,
        patch: MonitorPatch,
    ) -> Result<(), StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, operation, async {
            let _guard = self.lock_site(site_identifier).await;
            let site = self.require_site(site_identifier)?;
            let next = site_ops::update_monitor_in_site(&site, monitor_id, &patch)?;
            self.push_monitors(&next).await?;
            info!(operation, site_identifier, monitor_id, "monitor updated");
            Ok(())
        })
        .await
    }

    pub async fn initialize_sites(&self) -> Result<InitializeSitesResult, StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "initialize_sites", async {
            let sites = extract_ipc_data(self.bridge.sites.get_sites().await)?;
            let sites_loaded = sites.len();
            self.set_sites(sites);
            Ok(InitializeSitesResult {
                success: true,
                sites_loaded,
                message: format!("Successfully loaded {} sites", sites_loaded),
            })
        })
        .await
    }

    /// Creates a site; a site without monitors gets one default monitor.
    #[instrument(skip(self, site), fields(store = OPERATIONS_STORE, identifier = %site.identifier))]
    pub async fn create_site(&self, mut site: Site) -> Result<Site, StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "create_site", async {
            if site.monitors.is_empty() {
                site.monitors.push(create_default_monitor(None)?);
            }
            let created = extract_ipc_data(self.bridge.sites.add_site(site).await)?;
            self.add_site(created.clone());
            self.sync_sites_from_backend().await?;
            info!(identifier = %created.identifier, "site created");
            Ok(created)
        })
        .await
    }

    pub async fn modify_site(&self, identifier: &str, updates: SiteUpdate) -> Result<(), StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "modify_site", async {
            let _guard = self.lock_site(identifier).await;
            extract_ipc_data(self.bridge.sites.update_site(identifier, updates).await)?;
            self.sync_sites_from_backend().await
        })
        .await
    }

    /// Stops every monitor of the site, then removes it from backend and state.
    #[instrument(skip(self), fields(store = OPERATIONS_STORE))]
    pub async fn delete_site(&self, identifier: &str) -> Result<(), StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "delete_site", async {
            let site = self.require_site(identifier)?;
            try_join_all(site.monitors.iter().map(|m| async move {
                extract_ipc_data(
                    self.bridge
                        .monitoring
                        .stop_monitoring_for_site_monitor(identifier, &m.id)
                        .await,
                )
            }))
            .await?;
            extract_ipc_data(self.bridge.sites.remove_site(identifier).await)?;
            self.remove_site(identifier);
            self.sync_sites_from_backend().await?;
            info!(identifier, monitors = site.monitors.len(), "site deleted");
            Ok(())
        })
        .await
    }

    pub async fn add_monitor_to_site(
        &self,
        site_identifier: &str,
        monitor: Monitor,
    ) -> Result<(), StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "add_monitor_to_site", async {
            let _guard = self.lock_site(site_identifier).await;
            let site = self.require_site(site_identifier)?;
            let next = site_ops::add_monitor_to_site(&site, monitor);
            self.push_monitors(&next).await
        })
        .await
    }

    /// Refuses to remove a site's last monitor.
    pub async fn remove_monitor_from_site(
        &self,
        site_identifier: &str,
        monitor_id: &str,
    ) -> Result<(), StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "remove_monitor_from_site", async {
            let _guard = self.lock_site(site_identifier).await;
            let site = self.require_site(site_identifier)?;
            site_ops::validate_monitor_exists(Some(&site), monitor_id)?;
            if site.monitors.len() <= 1 {
                return Err(StoreError::LastMonitor(site.identifier));
            }
            let next = site_ops::remove_monitor_from_site(&site, monitor_id);
            self.push_monitors(&next).await
        })
        .await
    }

    pub async fn update_monitor_timeout(
        &self,
        site_identifier: &str,
        monitor_id: &str,
        timeout: u64,
    ) -> Result<(), StoreError> {
        let patch = MonitorPatch {
            timeout: Some(timeout),
            ..Default::default()
        };
        self.update_monitor("update_monitor_timeout", site_identifier, monitor_id, patch)
            .await
    }

    pub async fn update_monitor_retry_attempts(
        &self,
        site_identifier: &str,
        monitor_id: &str,
        retry_attempts: u32,
    ) -> Result<(), StoreError> {
        let patch = MonitorPatch {
            retry_attempts: Some(retry_attempts),
            ..Default::default()
        };
        self.update_monitor(
            "update_monitor_retry_attempts",
            site_identifier,
            monitor_id,
            patch,
        )
        .await
    }

    pub async fn update_site_check_interval(
        &self,
        site_identifier: &str,
        monitor_id: &str,
        check_interval: u64,
    ) -> Result<(), StoreError> {
        let patch = MonitorPatch {
            check_interval: Some(check_interval),
            ..Default::default()
        };
        self.update_monitor(
            "update_site_check_interval",
            site_identifier,
            monitor_id,
            patch,
        )
        .await
    }

    pub async fn download_sqlite_backup(&self) -> Result<BackupDownload, StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, "download_sqlite_backup", async {
            let backup = extract_ipc_data(self.bridge.data.download_sqlite_backup().await)?;
            info!(
                file_name = %backup.file_name,
                size_bytes = backup.metadata.size_bytes,
                "backup downloaded"
            );
            Ok(backup)
        })
        .await
    }
}
