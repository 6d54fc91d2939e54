// Process-wide error and loading registry, scoped per store and per operation.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::future::Future;

use crate::error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub last_error: Option<String>,
    pub is_loading: bool,
    pub store_errors: HashMap<String, String>,
    pub operation_loading: HashMap<String, bool>,
}

#[derive(Debug, Default)]
pub struct ErrorStore {
    state: RwLock<ErrorState>,
    /// Wrapped calls currently running, per operation name.
    in_flight: Mutex<HashMap<String, usize>>,
}

impl ErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ErrorState {
        self.state.read().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.write().last_error = error;
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.write().is_loading = loading;
    }

    /// `None` for a store that never recorded an error.
    pub fn store_error(&self, store: &str) -> Option<String> {
        self.state.read().store_errors.get(store).cloned()
    }

    pub fn set_store_error(&self, store: &str, error: Option<String>) {
        let mut state = self.state.write();
        match error {
            Some(msg) => {
                state.store_errors.insert(store.to_string(), msg);
            }
            None => {
                state.store_errors.remove(store);
            }
        }
    }

    pub fn clear_store_error(&self, store: &str) {
        self.set_store_error(store, None);
    }

    /// `false` for an operation that was never marked.
    pub fn operation_loading(&self, operation: &str) -> bool {
        self.state
            .read()
            .operation_loading
            .get(operation)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_operation_loading(&self, operation: &str, loading: bool) {
        self.state
            .write()
            .operation_loading
            .insert(operation.to_string(), loading);
    }

    pub fn clear_all_errors(&self) {
        *self.state.write() = ErrorState::default();
    }

    fn begin_operation<'a>(&'a self, operation: &'a str) -> OperationGuard<'a> {
        *self
            .in_flight
            .lock()
            .entry(operation.to_string())
            .or_default() += 1;
        self.set_operation_loading(operation, true);
        OperationGuard {
            errors: self,
            operation,
        }
    }

    fn end_operation(&self, operation: &str) {
        let mut in_flight = self.in_flight.lock();
        let remaining = match in_flight.get_mut(operation) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            in_flight.remove(operation);
            self.set_operation_loading(operation, false);
        }
    }
}

/// Clears an operation's loading flag once its last running call finishes,
/// including when the call's future is dropped.
struct OperationGuard<'a> {
    errors: &'a ErrorStore,
    operation: &'a str,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.errors.end_operation(self.operation);
    }
}

/// Runs `fut` as `operation` of `store`: marks it loading, clears the store's
/// previous error, records the new one on failure and returns the result as is.
pub async fn with_error_handling<T, F>(
    errors: &ErrorStore,
    store: &str,
    operation: &str,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let _guard = errors.begin_operation(operation);
    errors.clear_store_error(store);
    let result = fut.await;
    if let Err(e) = &result {
        tracing::warn!(store, operation, error = %e, "store operation failed");
        errors.set_store_error(store, Some(e.to_string()));
    }
    result
}
