//! Shared utilities for integration testing.

use std::sync::Arc;
use std::time::Duration;

use config_registry::config::SourceDecl;
use config_registry::store::memory::MemoryStore;

/// A declaration with test-friendly defaults.
#[allow(dead_code)]
pub fn decl(name: &str) -> SourceDecl {
    SourceDecl {
        name: name.to_string(),
        ..SourceDecl::default()
    }
}

/// Memory store seeded with one root of key/value pairs.
#[allow(dead_code)]
pub fn seeded_store(root: &str, pairs: &[(&str, &str)]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (key, value) in pairs {
        store.put(root, key, value);
    }
    store
}

/// Await until `predicate` holds, panicking after `timeout`.
#[allow(dead_code)]
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, predicate: F) {
    let deadline = tokio::time::Instant::now() + timeout;
    while !predicate() {
        if tokio::time::Instant::now() > deadline {
            panic!("condition not reached within {:?}", timeout);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
