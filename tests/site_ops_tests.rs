// Site helper and normalization properties

use proptest::prelude::*;
use serde_json::{Value, json};
use uptime_watcher::models::{MonitorKind, MonitorType, Site};
use uptime_watcher::normalize::normalize_monitor;
use uptime_watcher::site_ops::{add_monitor_to_site, find_monitor_in_site, remove_monitor_from_site};

fn site_with(ids: &[String]) -> Site {
    let mut site = Site::new("prop.example", None);
    site.monitors = ids
        .iter()
        .map(|id| normalize_monitor(&json!({"id": id})).unwrap())
        .collect();
    site
}

fn unique_ids() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::hash_set("[a-z0-9]{1,6}", 0..8).prop_map(|s| s.into_iter().collect())
}

fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z:/.]{0,12}".prop_map(Value::from),
    ]
}

fn partial_monitor() -> impl Strategy<Value = Value> {
    let keys = prop_oneof![
        Just("id"), Just("type"), Just("url"), Just("host"), Just("port"),
        Just("recordType"), Just("expectedValue"), Just("timeout"),
        Just("checkInterval"), Just("retryAttempts"), Just("status"), Just("monitoring"),
    ];
    let typ = prop_oneof![
        Just(json!("http")), Just(json!("port")), Just(json!("ping")),
        Just(json!("dns")), Just(json!("bogus")), Just(Value::Null),
    ];
    (proptest::collection::vec((keys, field_value()), 0..10), typ).prop_map(|(pairs, typ)| {
        let mut obj = serde_json::Map::new();
        for (k, v) in pairs {
            obj.insert(k.to_string(), v);
        }
        obj.insert("type".into(), typ);
        Value::Object(obj)
    })
}

fn expected_fields(t: MonitorType) -> &'static [&'static str] {
    match t {
        MonitorType::Http => &["url"],
        MonitorType::Port => &["host", "port"],
        MonitorType::Ping => &["host"],
        MonitorType::Dns => &["host", "recordType", "expectedValue"],
    }
}

proptest! {
    #[test]
    fn added_monitor_is_found(ids in unique_ids(), new_id in "new-[a-z]{1,4}") {
        let site = site_with(&ids);
        let m = normalize_monitor(&json!({"id": new_id})).unwrap();
        let next = add_monitor_to_site(&site, m.clone());
        prop_assert_eq!(next.monitors.len(), site.monitors.len() + 1);
        prop_assert_eq!(find_monitor_in_site(&next, &m.id), Some(&m));
        prop_assert_eq!(&next.monitors[..site.monitors.len()], &site.monitors[..]);
        prop_assert_eq!(&next.identifier, &site.identifier);
    }

    #[test]
    fn removed_monitor_is_gone(ids in unique_ids().prop_filter("non-empty", |v| !v.is_empty()), pick in any::<prop::sample::Index>()) {
        let site = site_with(&ids);
        let target = site.monitors[pick.index(site.monitors.len())].clone();
        let next = remove_monitor_from_site(&site, &target.id);
        prop_assert_eq!(next.monitors.len(), site.monitors.len() - 1);
        prop_assert!(!next.monitors.contains(&target));
    }

    #[test]
    fn normalized_monitor_has_only_its_type_fields(partial in partial_monitor()) {
        let m = normalize_monitor(&partial).unwrap();
        prop_assert!(MonitorType::ALL.contains(&m.monitor_type()));
        let json = serde_json::to_value(&m).unwrap();
        let expected = expected_fields(m.monitor_type());
        for field in ["url", "host", "port", "recordType", "expectedValue"] {
            prop_assert_eq!(json.get(field).is_some(), expected.contains(&field), "field {}", field);
        }
        prop_assert!(!m.id.is_empty());
    }
}

#[test]
fn normalized_type_follows_input() {
    let m = normalize_monitor(&json!({"type": "ping", "host": "10.0.0.1", "url": "x"})).unwrap();
    assert_eq!(m.kind, MonitorKind::Ping { host: "10.0.0.1".into() });
}
