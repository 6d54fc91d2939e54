// Model serialization tests (JSON camelCase, tagged monitor kinds)

use serde_json::json;
use uptime_watcher::models::*;

#[test]
fn test_monitor_serializes_camel_case_with_type_tag() {
    let monitor = Monitor {
        id: "m1".into(),
        kind: MonitorKind::Port {
            host: "db.local".into(),
            port: 5432,
        },
        status: MonitorStatus::Up,
        monitoring: true,
        response_time: 12,
        timeout: 10_000,
        check_interval: 60_000,
        retry_attempts: 3,
        history: vec![StatusHistory {
            timestamp: 10,
            status: HistoryStatus::Up,
            response_time: 12,
        }],
        active_operations: vec![],
        last_checked: None,
    };
    let json = serde_json::to_value(&monitor).unwrap();
    assert_eq!(json["type"], "port");
    assert_eq!(json["port"], 5432);
    assert_eq!(json["checkInterval"], 60_000);
    assert_eq!(json["retryAttempts"], 3);
    assert_eq!(json["history"][0]["responseTime"], 12);
    assert!(json.get("url").is_none());
    assert!(json.get("lastChecked").is_none());
    let back: Monitor = serde_json::from_value(json).unwrap();
    assert_eq!(back, monitor);
}

#[test]
fn test_site_deserializes_with_optional_fields() {
    let site: Site = serde_json::from_value(json!({"identifier": "a.com"})).unwrap();
    assert_eq!(site.name, None);
    assert!(site.monitoring);
    assert!(site.monitors.is_empty());
    assert_eq!(site.display_name(), "a.com");
}

#[test]
fn test_sync_status_failure_wire_shape() {
    let json = serde_json::to_value(SyncStatus::failure()).unwrap();
    assert_eq!(
        json,
        json!({"lastSyncAt": null, "siteCount": 0, "source": "frontend", "synchronized": false})
    );
}

#[test]
fn test_state_sync_event_action_kebab_case() {
    let event: StateSyncEvent = serde_json::from_value(json!({
        "action": "bulk-sync",
        "sites": [],
        "source": "backend",
        "timestamp": 5
    }))
    .unwrap();
    assert_eq!(event.action, SyncAction::BulkSync);
    assert_eq!(event.site_identifier, None);
}

#[test]
fn test_settings_fill_missing_fields_with_defaults() {
    let settings: AppSettings =
        serde_json::from_value(json!({"theme": "dark", "historyLimit": 0})).unwrap();
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.history_limit, 0);
    assert!(settings.notifications);
}

#[test]
fn test_history_oldest_first() {
    let mut monitor =
        uptime_watcher::normalize::create_default_monitor(None).unwrap();
    monitor.history = [30, 10, 20]
        .into_iter()
        .map(|timestamp| StatusHistory {
            timestamp,
            status: HistoryStatus::Down,
            response_time: 0,
        })
        .collect();
    let ordered: Vec<i64> = monitor
        .history_oldest_first()
        .into_iter()
        .map(|h| h.timestamp)
        .collect();
    assert_eq!(ordered, vec![10, 20, 30]);
}
