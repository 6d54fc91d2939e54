// Monitor, its type-specific kind and status history

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Fixed monitor type enumeration; serializes to lowercase JSON (e.g. "http").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorType {
    Http,
    Port,
    Ping,
    Dns,
}

impl MonitorType {
    pub const ALL: [MonitorType; 4] = [
        MonitorType::Http,
        MonitorType::Port,
        MonitorType::Ping,
        MonitorType::Dns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorType::Http => "http",
            MonitorType::Port => "port",
            MonitorType::Ping => "ping",
            MonitorType::Dns => "dns",
        }
    }

    /// Parse a wire value; `None` for anything outside the enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for MonitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Up,
    Down,
    #[default]
    Pending,
    Paused,
}

impl MonitorStatus {
    pub const ALL: [MonitorStatus; 4] = [
        MonitorStatus::Up,
        MonitorStatus::Down,
        MonitorStatus::Pending,
        MonitorStatus::Paused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStatus::Up => "up",
            MonitorStatus::Down => "down",
            MonitorStatus::Pending => "pending",
            MonitorStatus::Paused => "paused",
        }
    }

    /// Per-monitor status machine: pending -> up|down, up <-> down,
    /// any -> paused, paused -> pending. Repeating the current status is allowed.
    pub fn can_transition_to(self, next: MonitorStatus) -> bool {
        use MonitorStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (_, Paused) => true,
            (Pending, Up | Down) => true,
            (Up, Down) | (Down, Up) => true,
            (Paused, Pending) => true,
            _ => false,
        }
    }
}

impl FromStr for MonitorStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| StoreError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single check as recorded in history (never pending/paused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistory {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub status: HistoryStatus,
    pub response_time: i64,
}

/// Type-specific monitor fields. Only the fields of the tagged type exist,
/// so a port monitor can never carry a url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum MonitorKind {
    Http {
        url: String,
    },
    Port {
        host: String,
        port: u16,
    },
    Ping {
        host: String,
    },
    Dns {
        host: String,
        record_type: String,
        expected_value: String,
    },
}

impl MonitorKind {
    pub fn monitor_type(&self) -> MonitorType {
        match self {
            MonitorKind::Http { .. } => MonitorType::Http,
            MonitorKind::Port { .. } => MonitorType::Port,
            MonitorKind::Ping { .. } => MonitorType::Ping,
            MonitorKind::Dns { .. } => MonitorType::Dns,
        }
    }

    /// Target shown in UI summaries (url, host:port or host).
    pub fn target(&self) -> String {
        match self {
            MonitorKind::Http { url } => url.clone(),
            MonitorKind::Port { host, port } => format!("{}:{}", host, port),
            MonitorKind::Ping { host } => host.clone(),
            MonitorKind::Dns {
                host, record_type, ..
            } => format!("{} ({})", host, record_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: String,
    #[serde(flatten)]
    pub kind: MonitorKind,
    pub status: MonitorStatus,
    pub monitoring: bool,
    /// Milliseconds; -1 when unknown.
    pub response_time: i64,
    pub timeout: u64,
    pub check_interval: u64,
    pub retry_attempts: u32,
    #[serde(default)]
    pub history: Vec<StatusHistory>,
    #[serde(default)]
    pub active_operations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<i64>,
}

impl Monitor {
    pub fn monitor_type(&self) -> MonitorType {
        self.kind.monitor_type()
    }

    /// History ordered by timestamp ascending, as charts display it.
    pub fn history_oldest_first(&self) -> Vec<StatusHistory> {
        let mut out = self.history.clone();
        out.sort_by_key(|h| h.timestamp);
        out
    }
}
