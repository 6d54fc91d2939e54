// Normalization of partial/untrusted monitor records into complete monitors.
// The kind is rebuilt from scratch for the resolved type, so fields that
// belong to other types are dropped.

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::models::{Monitor, MonitorKind, MonitorStatus, MonitorType, StatusHistory};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 300_000;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const UNKNOWN_RESPONSE_TIME: i64 = -1;

const DEFAULT_URL: &str = "https://example.com";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 80;
const DEFAULT_RECORD_TYPE: &str = "A";

/// Fresh v4 UUID string.
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn string_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    non_empty_str(obj, key).unwrap_or(default).to_string()
}

/// Finite JSON number, truncated toward zero.
fn number(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    let v = obj.get(key)?;
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    v.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
}

fn positive_u64(obj: &Map<String, Value>, key: &str, default: u64) -> u64 {
    number(obj, key)
        .filter(|n| *n > 0)
        .map_or(default, |n| n as u64)
}

fn kind_for(monitor_type: MonitorType, obj: &Map<String, Value>) -> MonitorKind {
    match monitor_type {
        MonitorType::Http => MonitorKind::Http {
            url: string_or(obj, "url", DEFAULT_URL),
        },
        MonitorType::Port => MonitorKind::Port {
            host: string_or(obj, "host", DEFAULT_HOST),
            port: number(obj, "port")
                .and_then(|p| u16::try_from(p).ok())
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_PORT),
        },
        MonitorType::Ping => MonitorKind::Ping {
            host: string_or(obj, "host", DEFAULT_HOST),
        },
        MonitorType::Dns => MonitorKind::Dns {
            host: string_or(obj, "host", DEFAULT_HOST),
            record_type: string_or(obj, "recordType", DEFAULT_RECORD_TYPE).to_uppercase(),
            expected_value: obj
                .get("expectedValue")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
    }
}

/// Builds a complete, type-consistent monitor from a partial record.
pub fn normalize_monitor(partial: &Value) -> Result<Monitor, StoreError> {
    let Value::Object(obj) = partial else {
        return Err(StoreError::InvalidMonitorInput(kind_name(partial)));
    };

    let id = non_empty_str(obj, "id")
        .map(str::to_string)
        .unwrap_or_else(generate_uuid);

    let monitor_type = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(MonitorType::parse)
        .unwrap_or(MonitorType::Http);

    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<MonitorStatus>().ok())
        .unwrap_or_default();

    let history = match obj.get("history") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|h| serde_json::from_value::<StatusHistory>(h.clone()).ok())
            .collect(),
        _ => Vec::new(),
    };

    let active_operations = match obj.get("activeOperations") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|op| op.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    Ok(Monitor {
        id,
        kind: kind_for(monitor_type, obj),
        status,
        monitoring: obj
            .get("monitoring")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        response_time: number(obj, "responseTime")
            .filter(|n| *n >= UNKNOWN_RESPONSE_TIME)
            .unwrap_or(UNKNOWN_RESPONSE_TIME),
        timeout: positive_u64(obj, "timeout", DEFAULT_TIMEOUT_MS),
        check_interval: positive_u64(obj, "checkInterval", DEFAULT_CHECK_INTERVAL_MS),
        retry_attempts: number(obj, "retryAttempts")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_RETRY_ATTEMPTS),
        history,
        active_operations,
        last_checked: number(obj, "lastChecked").filter(|n| *n > 0),
    })
}

/// `normalize_monitor` over `overrides`, or over `{}` when absent.
pub fn create_default_monitor(overrides: Option<&Value>) -> Result<Monitor, StoreError> {
    match overrides {
        Some(v) => normalize_monitor(v),
        None => normalize_monitor(&Value::Object(Map::new())),
    }
}
