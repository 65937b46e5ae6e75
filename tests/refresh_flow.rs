//! End-to-end refresh flow over the in-memory store.

use std::time::Duration;

use config_registry::config::WatchConfig;
use config_registry::lifecycle::Shutdown;
use config_registry::registry::SourceRegistry;
use config_registry::store::ConfigStore;
use config_registry::watch::bridge::ChangeFuture;
use config_registry::watch::{SourceRefresher, SubscriptionStatus, WatchBridge};

mod common;

#[tokio::test]
async fn test_change_event_refreshes_registered_source() {
    let store = common::seeded_store("/configs", &[("feature.flag", "off")]);

    let mut registry = SourceRegistry::new();
    let initial = store.read_all("/configs").await.unwrap();
    let source = registry.register(&common::decl("app"), initial).unwrap();

    let bridge = WatchBridge::new(store.clone(), WatchConfig::default());
    let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");
    let _handle = bridge.subscribe("/configs", refresher.into_callback());

    assert_eq!(registry.lookup("feature.flag"), Some("off".to_string()));

    common::wait_until(Duration::from_secs(2), || {
        store.watcher_count("/configs") > 0
    })
    .await;
    store.put("/configs", "feature.flag", "on");
    common::wait_until(Duration::from_secs(5), || {
        source.get("feature.flag") == Some("on".to_string())
    })
    .await;

    assert_eq!(registry.lookup("feature.flag"), Some("on".to_string()));
}

#[tokio::test]
async fn test_watch_survives_stream_loss() {
    let store = common::seeded_store("/configs", &[("key", "v1")]);

    let mut registry = SourceRegistry::new();
    let initial = store.read_all("/configs").await.unwrap();
    let source = registry.register(&common::decl("app"), initial).unwrap();

    let config = WatchConfig {
        max_retries: 5,
        base_delay_ms: 10,
        max_delay_ms: 50,
    };
    let bridge = WatchBridge::new(store.clone(), config);
    let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");
    let _handle = bridge.subscribe("/configs", refresher.into_callback());

    // Simulate a dropped connection; the bridge re-subscribes on its own.
    store.drop_watchers("/configs");

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        store.put("/configs", "key", "v2");
        tokio::time::sleep(Duration::from_millis(50)).await;
        if source.get("key") == Some("v2".to_string()) {
            break;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("source not refreshed after stream loss");
        }
    }
}

#[tokio::test]
async fn test_retry_budget_exhaustion_keeps_last_values() {
    let store = common::seeded_store("/configs", &[("key", "v1")]);

    let mut registry = SourceRegistry::new();
    let initial = store.read_all("/configs").await.unwrap();
    let source = registry.register(&common::decl("app"), initial).unwrap();

    store.set_watch_failing(true);

    let config = WatchConfig {
        max_retries: 2,
        base_delay_ms: 1,
        max_delay_ms: 5,
    };
    let bridge = WatchBridge::new(store.clone(), config);
    let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");
    let handle = bridge.subscribe("/configs", refresher.into_callback());

    let mut status = handle.status_stream();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if matches!(*status.borrow_and_update(), SubscriptionStatus::Failed { .. }) {
                break;
            }
            status.changed().await.unwrap();
        }
    })
    .await
    .expect("subscription did not fail within the retry budget");

    assert_eq!(handle.status(), SubscriptionStatus::Failed { retries: 2 });

    // Refresh has stopped; previously loaded values remain in effect.
    store.set_watch_failing(false);
    store.put("/configs", "key", "v2");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.get("key"), Some("v1".to_string()));

    common::wait_until(Duration::from_secs(2), || bridge.active_subscriptions() == 0).await;
}

#[tokio::test]
async fn test_shutdown_signal_stops_subscription() {
    let store = common::seeded_store("/configs", &[("key", "v1")]);

    let shutdown = Shutdown::new();
    let bridge = WatchBridge::new(store.clone(), WatchConfig::default());
    let handle = bridge.subscribe_with_shutdown(
        "/configs",
        Box::new(|_event| Box::pin(async {}) as ChangeFuture),
        shutdown.subscribe(),
    );

    common::wait_until(Duration::from_secs(2), || bridge.active_subscriptions() == 1).await;
    shutdown.trigger();

    let mut status = handle.status_stream();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if *status.borrow_and_update() == SubscriptionStatus::Stopped {
                break;
            }
            status.changed().await.unwrap();
        }
    })
    .await
    .expect("subscription did not stop on shutdown");

    assert_eq!(bridge.active_subscriptions(), 0);
}
