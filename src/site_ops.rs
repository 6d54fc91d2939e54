// Pure site/monitor mutation helpers. Every helper returns a new value and
// leaves its input untouched.

use crate::error::StoreError;
use crate::models::{Monitor, MonitorKind, MonitorStatus, Site};

/// Field changes merged into an existing monitor. Has no `id`, so a patch can
/// never rename a monitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorPatch {
    pub kind: Option<MonitorKind>,
    pub status: Option<MonitorStatus>,
    pub monitoring: Option<bool>,
    pub response_time: Option<i64>,
    pub timeout: Option<u64>,
    pub check_interval: Option<u64>,
    pub retry_attempts: Option<u32>,
}

impl MonitorPatch {
    pub fn apply(&self, monitor: &Monitor) -> Monitor {
        let mut next = monitor.clone();
        if let Some(kind) = &self.kind {
            next.kind = kind.clone();
        }
        if let Some(v) = self.status {
            next.status = v;
        }
        if let Some(v) = self.monitoring {
            next.monitoring = v;
        }
        if let Some(v) = self.response_time {
            next.response_time = v;
        }
        if let Some(v) = self.timeout {
            next.timeout = v;
        }
        if let Some(v) = self.check_interval {
            next.check_interval = v;
        }
        if let Some(v) = self.retry_attempts {
            next.retry_attempts = v;
        }
        next
    }
}

pub fn add_monitor_to_site(site: &Site, monitor: Monitor) -> Site {
    let mut next = site.clone();
    next.monitors.push(monitor);
    next
}

pub fn find_monitor_in_site<'a>(site: &'a Site, monitor_id: &str) -> Option<&'a Monitor> {
    site.monitors.iter().find(|m| m.id == monitor_id)
}

/// Copy of `site` without the monitor; an unknown id yields an unchanged copy.
pub fn remove_monitor_from_site(site: &Site, monitor_id: &str) -> Site {
    let mut next = site.clone();
    next.monitors.retain(|m| m.id != monitor_id);
    next
}

pub fn update_monitor_in_site(
    site: &Site,
    monitor_id: &str,
    patch: &MonitorPatch,
) -> Result<Site, StoreError> {
    validate_monitor_exists(Some(site), monitor_id)?;
    let mut next = site.clone();
    for m in next.monitors.iter_mut().filter(|m| m.id == monitor_id) {
        *m = patch.apply(m);
    }
    Ok(next)
}

pub fn validate_monitor_exists(site: Option<&Site>, monitor_id: &str) -> Result<(), StoreError> {
    let Some(site) = site else {
        return Err(StoreError::MissingSite);
    };
    if find_monitor_in_site(site, monitor_id).is_none() {
        return Err(StoreError::MonitorNotFound {
            site_identifier: site.identifier.clone(),
            monitor_id: monitor_id.to_string(),
        });
    }
    Ok(())
}

/// Single-field monitor updaters.
pub mod monitor_operations {
    use super::*;

    pub fn toggle_monitoring(monitor: &Monitor) -> Monitor {
        Monitor {
            monitoring: !monitor.monitoring,
            ..monitor.clone()
        }
    }

    pub fn update_check_interval(monitor: &Monitor, check_interval: u64) -> Monitor {
        Monitor {
            check_interval,
            ..monitor.clone()
        }
    }

    pub fn update_retry_attempts(monitor: &Monitor, retry_attempts: u32) -> Monitor {
        Monitor {
            retry_attempts,
            ..monitor.clone()
        }
    }

    /// Fails for any value outside {up, down, pending, paused}.
    pub fn update_status(monitor: &Monitor, status: &str) -> Result<Monitor, StoreError> {
        let status = status.parse::<MonitorStatus>()?;
        Ok(Monitor {
            status,
            ..monitor.clone()
        })
    }

    pub fn update_timeout(monitor: &Monitor, timeout: u64) -> Monitor {
        Monitor {
            timeout,
            ..monitor.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::monitor_operations::*;
    use super::*;
    use crate::normalize::create_default_monitor;
    use serde_json::json;

    fn monitor(id: &str) -> Monitor {
        create_default_monitor(Some(&json!({"id": id}))).unwrap()
    }

    fn site() -> Site {
        let mut s = Site::new("example.com", Some("Example".into()));
        s.monitors = vec![monitor("m1"), monitor("m2")];
        s
    }

    #[test]
    fn update_merges_patch_without_touching_id() {
        let s = site();
        let patch = MonitorPatch {
            timeout: Some(42),
            ..Default::default()
        };
        let next = update_monitor_in_site(&s, "m2", &patch).unwrap();
        let m = find_monitor_in_site(&next, "m2").unwrap();
        assert_eq!(m.timeout, 42);
        assert_eq!(m.id, "m2");
        assert_eq!(s.monitors[1].timeout, crate::normalize::DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn update_unknown_monitor_fails() {
        let err = update_monitor_in_site(&site(), "nope", &MonitorPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::MonitorNotFound { .. }));
    }

    #[test]
    fn validate_requires_site() {
        assert!(validate_monitor_exists(None, "m1").is_err());
        assert!(validate_monitor_exists(Some(&site()), "m1").is_ok());
    }

    #[test]
    fn remove_unknown_is_noop_copy() {
        let s = site();
        assert_eq!(remove_monitor_from_site(&s, "nope"), s);
    }

    #[test]
    fn single_field_updaters() {
        let m = monitor("m1");
        assert!(!toggle_monitoring(&m).monitoring);
        assert_eq!(update_check_interval(&m, 60_000).check_interval, 60_000);
        assert_eq!(update_retry_attempts(&m, 0).retry_attempts, 0);
        assert_eq!(update_timeout(&m, 5).timeout, 5);
        assert_eq!(
            update_status(&m, "down").unwrap().status,
            MonitorStatus::Down
        );
        assert!(update_status(&m, "unknown").is_err());
        assert!(m.monitoring);
    }
}
