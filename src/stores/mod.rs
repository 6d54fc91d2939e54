// In-memory stores: errors, settings, sites

pub mod error_store;
pub mod settings;
pub mod sites;

pub use error_store::{ErrorState, ErrorStore, with_error_handling};
pub use settings::{SettingsFile, SettingsStore, reconcile_history_limit};
pub use sites::{InitializeSitesResult, SitesState, SitesStore, SyncSubscription};
