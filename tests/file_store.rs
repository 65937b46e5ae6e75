//! Filesystem store flows, end to end.

use std::time::Duration;

use config_registry::config::WatchConfig;
use config_registry::registry::SourceRegistry;
use config_registry::store::file::FileConnector;
use config_registry::store::{ConfigStore, StoreConnector};
use config_registry::watch::{SourceRefresher, WatchBridge};

mod common;

#[tokio::test]
async fn test_file_backed_bootstrap_and_refresh() {
    let base = tempfile::tempdir().unwrap();
    let dir = base.path().join("configs");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("feature.flag"), "off").unwrap();

    let connector = FileConnector::new(Duration::from_secs(1));
    let store = connector
        .connect(base.path().to_str().unwrap())
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    let initial = store.read_all("/configs").await.unwrap();
    let source = registry.register(&common::decl("app"), initial).unwrap();
    assert_eq!(source.get("feature.flag"), Some("off".to_string()));

    let bridge = WatchBridge::new(store.clone(), WatchConfig::default());
    let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");
    let _handle = bridge.subscribe("/configs", refresher.into_callback());

    // Let the watcher settle before mutating the directory.
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(dir.join("feature.flag"), "on").unwrap();

    common::wait_until(Duration::from_secs(10), || {
        source.get("feature.flag") == Some("on".to_string())
    })
    .await;
}

#[tokio::test]
async fn test_new_key_appears_after_refresh() {
    let base = tempfile::tempdir().unwrap();
    let dir = base.path().join("configs");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("existing"), "1").unwrap();

    let connector = FileConnector::new(Duration::from_secs(1));
    let store = connector
        .connect(base.path().to_str().unwrap())
        .await
        .unwrap();

    let mut registry = SourceRegistry::new();
    let initial = store.read_all("/configs").await.unwrap();
    let source = registry.register(&common::decl("app"), initial).unwrap();

    let bridge = WatchBridge::new(store.clone(), WatchConfig::default());
    let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");
    let _handle = bridge.subscribe("/configs", refresher.into_callback());

    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(dir.join("added"), "2").unwrap();

    common::wait_until(Duration::from_secs(10), || {
        source.get("added") == Some("2".to_string())
    })
    .await;
    assert_eq!(registry.lookup("existing"), Some("1".to_string()));
}
