// Frontend/backend sync status and state-sync events

use serde::{Deserialize, Serialize};

use super::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    Frontend,
    Backend,
    Cache,
}

/// Point-in-time view of backend/frontend agreement. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub last_sync_at: Option<i64>,
    pub site_count: usize,
    pub source: SyncSource,
    pub synchronized: bool,
}

impl SyncStatus {
    /// Returned whenever the status query fails.
    pub fn failure() -> Self {
        Self {
            last_sync_at: None,
            site_count: 0,
            source: SyncSource::Frontend,
            synchronized: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncAction {
    BulkSync,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSyncEvent {
    pub action: SyncAction,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_identifier: Option<String>,
    pub source: SyncSource,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncResult {
    pub completed_at: i64,
    pub site_count: usize,
    pub sites: Vec<Site>,
    pub synchronized: bool,
}
