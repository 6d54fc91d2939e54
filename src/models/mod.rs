// Domain models shared with the main process (camelCase on the wire)

mod backup;
mod monitor;
mod settings;
mod site;
mod sync;

pub use backup::{BackupDownload, BackupMetadata};
pub use monitor::{
    HistoryStatus, Monitor, MonitorKind, MonitorStatus, MonitorType, StatusHistory,
};
pub use settings::{AppSettings, SettingsPatch, Theme};
pub use site::{Site, SiteUpdate};
pub use sync::{FullSyncResult, StateSyncEvent, SyncAction, SyncSource, SyncStatus};
