// Store and bridge error types

use thiserror::Error;

/// Transport-level rejection of a bridge call (the call itself failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BridgeError(pub String);

impl BridgeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("monitor input must be an object, got {0}")]
    InvalidMonitorInput(&'static str),

    #[error("invalid monitor status: {0}")]
    InvalidStatus(String),

    #[error("site is required")]
    MissingSite,

    #[error("site not found: {0}")]
    SiteNotFound(String),

    #[error("monitor {monitor_id} not found in site {site_identifier}")]
    MonitorNotFound {
        site_identifier: String,
        monitor_id: String,
    },

    #[error("cannot remove the last monitor from site {0}")]
    LastMonitor(String),

    /// Backend failure; the message is passed through unmodified.
    #[error("{0}")]
    Backend(String),

    #[error("Invalid IPC response format")]
    InvalidResponse,
}

impl From<BridgeError> for StoreError {
    fn from(e: BridgeError) -> Self {
        StoreError::Backend(e.0)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
