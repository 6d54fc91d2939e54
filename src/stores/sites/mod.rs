// Sites store: shared site/selection state plus four action groups
// (state, sync, operations, monitoring), each in its own file.

mod monitoring;
mod operations;
mod state;
mod sync;

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use super::error_store::ErrorStore;
use crate::bridge::Bridge;
use crate::models::Site;

pub use operations::InitializeSitesResult;
pub use sync::SyncSubscription;

/// Error-store key for create/modify/delete and monitoring actions.
pub const OPERATIONS_STORE: &str = "sites-operations";
/// Error-store key for backend pulls.
pub const SYNC_STORE: &str = "sites-sync";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SitesState {
    pub sites: Vec<Site>,
    pub selected_site_identifier: Option<String>,
    /// Selected monitor id per site identifier.
    pub selected_monitor_ids: HashMap<String, String>,
}

pub struct SitesStore {
    state: RwLock<SitesState>,
    bridge: Bridge,
    errors: Arc<ErrorStore>,
    /// One async lock per site identifier; held across read-modify-write of a
    /// site's monitor list so concurrent edits cannot overwrite each other.
    site_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SitesStore {
    pub fn new(bridge: Bridge, errors: Arc<ErrorStore>) -> Self {
        Self {
            state: RwLock::new(SitesState::default()),
            bridge,
            errors,
            site_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_site(&self, identifier: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .site_locks
            .lock()
            .entry(identifier.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    pub fn snapshot(&self) -> SitesState {
        self.state.read().clone()
    }

    pub fn reset(&self) {
        *self.state.write() = SitesState::default();
    }
}
