// IPC response envelope {success, data, error} and its extraction.
// The bridge contract is envelope-always: every bridge method resolves to an
// IpcResponse (or rejects with a BridgeError).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> IpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Wraps a handler result the way main-process IPC handlers reply.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Result of awaiting a bridge call.
pub type BridgeResult<T> = Result<IpcResponse<T>, BridgeError>;

/// Strict extraction for mutation paths: any failure is returned as an error.
pub fn extract_ipc_data<T>(response: BridgeResult<T>) -> Result<T, StoreError> {
    let envelope = response?;
    if !envelope.success {
        return Err(StoreError::Backend(
            envelope
                .error
                .unwrap_or_else(|| "IPC operation failed".to_string()),
        ));
    }
    envelope.data.ok_or(StoreError::InvalidResponse)
}

/// Parses a raw JSON reply as an envelope. On success `data` is returned as
/// is, including `null` when `T` accepts it; missing `data` reads as `null`.
pub fn extract_ipc_value<T: DeserializeOwned>(
    mut value: serde_json::Value,
) -> Result<T, StoreError> {
    let Some(success) = value.get("success").and_then(|s| s.as_bool()) else {
        return Err(StoreError::InvalidResponse);
    };
    if !success {
        let error = value
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("IPC operation failed");
        return Err(StoreError::Backend(error.to_string()));
    }
    let data = value
        .get_mut("data")
        .map(serde_json::Value::take)
        .unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data).map_err(|_| StoreError::InvalidResponse)
}

/// Advisory extraction: failures are logged and replaced by `fallback`.
pub fn safe_extract_ipc_data<T>(response: BridgeResult<T>, operation: &str, fallback: T) -> T {
    match extract_ipc_data(response) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, operation, "IPC call failed; using fallback");
            fallback
        }
    }
}
