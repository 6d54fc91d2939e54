// SQLite backup download payload

use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    /// Epoch milliseconds.
    pub created_at: i64,
    pub size_bytes: u64,
    pub site_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDownload {
    pub buffer: Bytes,
    pub file_name: String,
    pub metadata: BackupMetadata,
}
