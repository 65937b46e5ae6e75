//! Filesystem backing store.
//!
//! # Responsibilities
//! - Map a root path to a directory under the connected base directory
//! - Read one key per file: the file name is the key, the contents the value
//! - Watch the directory and emit change events on create/modify/remove
//!
//! # Design Decisions
//! - Layout mirrors a coordination-service namespace: one node per key
//! - Trailing whitespace is stripped from values so hand-edited files
//!   behave predictably
//! - The notify watcher lives as long as the event stream has a consumer

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::store::{ChangeEvent, ConfigStore, PropertyMap, StoreConnector, StoreError};

/// A store backed by a directory tree on the local filesystem.
#[derive(Debug)]
pub struct FileStore {
    base: PathBuf,
    poll_interval: Duration,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            base: base.into(),
            poll_interval,
        }
    }

    fn resolve(&self, root_path: &str) -> Result<PathBuf, StoreError> {
        let relative = root_path.trim_start_matches('/');
        let dir = self.base.join(relative);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::PathNotFound(root_path.to_string()))
        }
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn read_all(&self, root_path: &str) -> Result<PropertyMap, StoreError> {
        let dir = self.resolve(root_path)?;
        let mut values = PropertyMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let key = entry.file_name().to_string_lossy().into_owned();
            let raw = std::fs::read_to_string(entry.path())?;
            values.insert(key, raw.trim_end().to_string());
        }
        Ok(values)
    }

    async fn watch(
        &self,
        root_path: &str,
    ) -> Result<mpsc::UnboundedReceiver<ChangeEvent>, StoreError> {
        let dir = self.resolve(root_path)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        let watched_path = root_path.to_string();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        let _ = event_tx.send(ChangeEvent {
                            path: watched_path.clone(),
                        });
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "File watch error");
                }
            },
            Config::default().with_poll_interval(self.poll_interval),
        )
        .map_err(|e| StoreError::Watch {
            path: root_path.to_string(),
            reason: e.to_string(),
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| StoreError::Watch {
                path: root_path.to_string(),
                reason: e.to_string(),
            })?;

        // The watcher stops when its last consumer goes away.
        tokio::spawn(async move {
            tx.closed().await;
            drop(watcher);
        });

        Ok(rx)
    }
}

/// Connector treating the connect string as a base directory.
pub struct FileConnector {
    poll_interval: Duration,
}

impl FileConnector {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

#[async_trait]
impl StoreConnector for FileConnector {
    async fn connect(&self, connect_string: &str) -> Result<Arc<dyn ConfigStore>, StoreError> {
        let base = Path::new(connect_string);
        if !base.is_dir() {
            return Err(StoreError::Connection {
                target: connect_string.to_string(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(Arc::new(FileStore::new(base, self.poll_interval)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_all_one_key_per_file() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("configs");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("db.url"), "postgres://localhost\n").unwrap();
        std::fs::write(dir.join("pool.size"), "8").unwrap();

        let store = FileStore::new(base.path(), Duration::from_secs(1));
        let values = store.read_all("/configs").await.unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["db.url"], "postgres://localhost");
        assert_eq!(values["pool.size"], "8");
    }

    #[tokio::test]
    async fn test_read_all_missing_root() {
        let base = tempfile::tempdir().unwrap();
        let store = FileStore::new(base.path(), Duration::from_secs(1));
        let err = store.read_all("/missing").await.unwrap_err();
        assert!(matches!(err, StoreError::PathNotFound(_)));
    }

    #[tokio::test]
    async fn test_connect_requires_directory() {
        let connector = FileConnector::new(Duration::from_secs(1));
        let err = connector.connect("/no/such/dir").await.unwrap_err();
        assert!(matches!(err, StoreError::Connection { .. }));
    }
}
