// Monitoring actions: start/stop per site or per monitor, on-demand checks.

use tracing::debug;

use super::{OPERATIONS_STORE, SitesStore};
use crate::error::StoreError;
use crate::ipc::{BridgeResult, extract_ipc_data};
use crate::stores::error_store::with_error_handling;

impl SitesStore {
    async fn monitoring_call(
        &self,
        operation: &'static str,
        call: impl Future<Output = BridgeResult<bool>>,
    ) -> Result<(), StoreError> {
        with_error_handling(&self.errors, OPERATIONS_STORE, operation, async {
            let accepted = extract_ipc_data(call.await)?;
            debug!(operation, accepted, "monitoring call completed");
            self.sync_sites_from_backend().await
        })
        .await
    }

    pub async fn start_site_monitoring(&self, identifier: &str) -> Result<(), StoreError> {
        self.monitoring_call(
            "start_site_monitoring",
            self.bridge.monitoring.start_monitoring_for_site(identifier),
        )
        .await
    }

    pub async fn stop_site_monitoring(&self, identifier: &str) -> Result<(), StoreError> {
        self.monitoring_call(
            "stop_site_monitoring",
            self.bridge.monitoring.stop_monitoring_for_site(identifier),
        )
        .await
    }

    pub async fn start_site_monitor_monitoring(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> Result<(), StoreError> {
        self.monitoring_call(
            "start_site_monitor_monitoring",
            self.bridge
                .monitoring
                .start_monitoring_for_site_monitor(identifier, monitor_id),
        )
        .await
    }

    pub async fn stop_site_monitor_monitoring(
        &self,
        identifier: &str,
        monitor_id: &str,
    ) -> Result<(), StoreError> {
        self.monitoring_call(
            "stop_site_monitor_monitoring",
            self.bridge
                .monitoring
                .stop_monitoring_for_site_monitor(identifier, monitor_id),
        )
        .await
    }

    /// Runs one check immediately.
    pub async fn check_site_now(&self, identifier: &str, monitor_id: &str) -> Result<(), StoreError> {
        self.monitoring_call(
            "check_site_now",
            self.bridge.monitoring.check_site_now(identifier, monitor_id),
        )
        .await
    }
}
