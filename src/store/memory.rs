//! In-memory backing store.
//!
//! # Responsibilities
//! - Hold configuration roots entirely in memory
//! - Emit change events to watchers on every mutation
//! - Simulate connection loss and watch failures for tests
//!
//! # Design Decisions
//! - Mutations implicitly create their root; reads of an unknown root fail
//! - Watch streams are dropped on `drop_watchers`, mirroring how a real
//!   store connection loss closes the notification channel

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::store::{ChangeEvent, ConfigStore, PropertyMap, StoreConnector, StoreError};

/// A purely in-memory store, used in tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    roots: DashMap<String, PropertyMap>,
    watchers: DashMap<String, Vec<mpsc::UnboundedSender<ChangeEvent>>>,
    fail_watches: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key under a root path, creating the root if absent.
    pub fn put(&self, root_path: &str, key: &str, value: &str) {
        self.roots
            .entry(root_path.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.notify(root_path);
    }

    /// Remove a key under a root path.
    pub fn remove(&self, root_path: &str, key: &str) {
        if let Some(mut root) = self.roots.get_mut(root_path) {
            root.remove(key);
        }
        self.notify(root_path);
    }

    /// Drop every watcher of a root path, as a lost connection would.
    pub fn drop_watchers(&self, root_path: &str) {
        self.watchers.remove(root_path);
    }

    /// Make subsequent `watch` calls fail, as an unreachable store would.
    pub fn set_watch_failing(&self, failing: bool) {
        self.fail_watches.store(failing, Ordering::Relaxed);
    }

    /// Number of live watchers on a root path.
    pub fn watcher_count(&self, root_path: &str) -> usize {
        self.watchers
            .get(root_path)
            .map(|senders| senders.len())
            .unwrap_or(0)
    }

    fn notify(&self, root_path: &str) {
        if let Some(mut senders) = self.watchers.get_mut(root_path) {
            senders.retain(|tx| {
                tx.send(ChangeEvent {
                    path: root_path.to_string(),
                })
                .is_ok()
            });
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn read_all(&self, root_path: &str) -> Result<PropertyMap, StoreError> {
        self.roots
            .get(root_path)
            .map(|root| root.value().clone())
            .ok_or_else(|| StoreError::PathNotFound(root_path.to_string()))
    }

    async fn watch(
        &self,
        root_path: &str,
    ) -> Result<mpsc::UnboundedReceiver<ChangeEvent>, StoreError> {
        if self.fail_watches.load(Ordering::Relaxed) {
            return Err(StoreError::Watch {
                path: root_path.to_string(),
                reason: "store unreachable".to_string(),
            });
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers
            .entry(root_path.to_string())
            .or_default()
            .push(tx);
        Ok(rx)
    }
}

/// Connector over a set of named in-memory stores.
///
/// Targets must be created with [`MemoryCluster::store`] before they can be
/// connected to; connecting to an unknown target fails the way an
/// unreachable endpoint would.
#[derive(Default)]
pub struct MemoryCluster {
    stores: DashMap<String, Arc<MemoryStore>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the store behind a connect string.
    pub fn store(&self, connect_string: &str) -> Arc<MemoryStore> {
        self.stores
            .entry(connect_string.to_string())
            .or_insert_with(|| Arc::new(MemoryStore::new()))
            .clone()
    }
}

#[async_trait]
impl StoreConnector for MemoryCluster {
    async fn connect(&self, connect_string: &str) -> Result<Arc<dyn ConfigStore>, StoreError> {
        match self.stores.get(connect_string) {
            Some(store) => Ok(store.clone() as Arc<dyn ConfigStore>),
            None => Err(StoreError::Connection {
                target: connect_string.to_string(),
                reason: "no such store".to_string(),
            }),
        }
    }
}
