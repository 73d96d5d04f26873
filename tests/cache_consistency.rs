//! Cache consistency tests against an in-memory device.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use vyos_config::config::PersistenceMode;
use vyos_config::{ConfigCache, ConfigPath, ConfigValue, Error};

mod common;

fn firewall() -> serde_json::Value {
    json!({"firewall": {"name": {"TEST": {"default-action": "drop"}}}})
}

fn path(wire: &str) -> ConfigPath {
    ConfigPath::parse(wire).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_fetch_once() {
    let session = common::InMemorySession::with_fetch_delay(firewall(), Duration::from_millis(50));
    let cache = Arc::new(ConfigCache::new(session.clone(), PersistenceMode::Skip));

    cache.get_full_config().await.unwrap();
    cache.invalidate().await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.show(&path("firewall name TEST")).await
        }));
    }
    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        assert_eq!(value, Some(ConfigValue::from(json!({"default-action": "drop"}))));
    }

    // One fetch before the invalidation, one for all sixteen readers.
    assert_eq!(session.fetch_count(), 2);
}

#[tokio::test]
async fn test_end_to_end_show() {
    let cache = ConfigCache::new(common::InMemorySession::new(firewall()), PersistenceMode::Skip);

    assert_eq!(
        cache.show(&path("firewall name TEST")).await.unwrap(),
        Some(ConfigValue::from(json!({"default-action": "drop"})))
    );
    assert_eq!(
        cache.show(&path("firewall name TEST default-action")).await.unwrap(),
        Some(ConfigValue::from("drop"))
    );
    assert_eq!(cache.show(&path("firewall name OTHER")).await.unwrap(), None);
}

#[tokio::test]
async fn test_update_round_trip() {
    let session = common::InMemorySession::new(firewall());
    let cache = ConfigCache::new(session.clone(), PersistenceMode::SaveDefault);
    let desired = json!({"default-action": "accept", "rule": {"10": {"action": "accept"}}});

    cache.show(&path("firewall name TEST")).await.unwrap();
    cache
        .update(&path("firewall name TEST"), &desired.to_string())
        .await
        .unwrap();

    assert_eq!(
        cache.show(&path("firewall name TEST")).await.unwrap(),
        Some(ConfigValue::from(desired))
    );
    assert_eq!(session.fetch_count(), 2);
    assert_eq!(session.saves.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_update_removes_stale_leaves() {
    let session = common::InMemorySession::new(json!({
        "firewall": {"name": {"TEST": {
            "default-action": "drop",
            "rule": {"10": {"action": "drop"}}
        }}}
    }));
    let cache = ConfigCache::new(session.clone(), PersistenceMode::Skip);

    cache
        .update(&path("firewall name TEST"), r#"{"default-action": "accept"}"#)
        .await
        .unwrap();

    assert_eq!(
        cache.show(&path("firewall name TEST")).await.unwrap(),
        Some(ConfigValue::from(json!({"default-action": "accept"})))
    );
}

#[tokio::test]
async fn test_set_primitive_round_trip() {
    let session = common::InMemorySession::new(firewall());
    let cache = ConfigCache::new(session.clone(), PersistenceMode::Skip);

    cache
        .set(&path("system host-name"), &ConfigValue::from("router"))
        .await
        .unwrap();

    assert_eq!(
        cache.show(&path("system host-name")).await.unwrap(),
        Some(ConfigValue::from("router"))
    );
}

#[tokio::test]
async fn test_failed_batch_applies_nothing() {
    let session = common::InMemorySession::new(firewall());
    let cache = ConfigCache::new(session.clone(), PersistenceMode::SaveDefault);

    // Nothing exists at the target, so the leading delete fails on the device.
    let err = cache
        .update(&path("firewall name MISSING"), r#"{"default-action": "drop"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote(_)));

    assert_eq!(session.tree(), ConfigValue::from(firewall()));
    assert!(session.batches().is_empty());
    assert_eq!(session.saves.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_device_reads_as_absent() {
    let session = common::InMemorySession::new(json!({}));
    let cache = ConfigCache::new(session.clone(), PersistenceMode::Skip);

    assert!(cache.get_full_config().await.unwrap().is_absent());
    assert_eq!(cache.show(&path("firewall")).await.unwrap(), None);
    assert_eq!(session.fetch_count(), 1);
}

#[tokio::test]
async fn test_delete_then_show_is_absent() {
    let session = common::InMemorySession::new(firewall());
    let cache = ConfigCache::new(session.clone(), PersistenceMode::Skip);

    cache.delete(&path("firewall name TEST")).await.unwrap();
    assert_eq!(cache.show(&path("firewall name TEST")).await.unwrap(), None);
    assert_eq!(
        cache.show(&path("firewall name")).await.unwrap(),
        Some(ConfigValue::presence_flag())
    );
}
