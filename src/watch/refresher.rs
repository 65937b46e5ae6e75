//! Refresh glue between change events and property sources.
//!
//! # Responsibilities
//! - Re-read a source's root path when the store reports a change
//! - Swap the source snapshot atomically on success
//! - Keep the previous snapshot when the re-read fails
//!
//! # Design Decisions
//! - A failed re-read warns and keeps stale values; configuration consumers
//!   prefer last-known data over no data

use std::sync::Arc;

use crate::observability::metrics;
use crate::registry::PropertySource;
use crate::store::{ChangeEvent, ConfigStore};
use crate::watch::bridge::{ChangeFuture, OnChange};

/// Re-reads one source's values from its backing store.
#[derive(Clone)]
pub struct SourceRefresher {
    store: Arc<dyn ConfigStore>,
    source: Arc<PropertySource>,
    root_path: String,
}

impl SourceRefresher {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        source: Arc<PropertySource>,
        root_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            source,
            root_path: root_path.into(),
        }
    }

    pub fn source(&self) -> &Arc<PropertySource> {
        &self.source
    }

    /// Re-read the root path and swap the source snapshot.
    pub async fn refresh(&self) {
        match self.store.read_all(&self.root_path).await {
            Ok(values) => {
                let keys = values.len();
                self.source.replace(values);
                metrics::record_refresh(self.source.name());
                tracing::info!(source = %self.source.name(), keys, "Config source refreshed");
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source.name(),
                    error = %e,
                    "Refresh failed, keeping last known values"
                );
            }
        }
    }

    /// Adapt this refresher into a watch callback.
    pub fn into_callback(self) -> OnChange {
        Box::new(move |event: ChangeEvent| {
            let refresher = self.clone();
            Box::pin(async move {
                tracing::debug!(path = %event.path, "Change event received");
                refresher.refresh().await;
            }) as ChangeFuture
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::PropertyMap;

    #[tokio::test]
    async fn test_refresh_swaps_values() {
        let store = Arc::new(MemoryStore::new());
        store.put("/configs", "key", "v1");

        let source = Arc::new(PropertySource::new("app", true, PropertyMap::new()));
        let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");

        refresher.refresh().await;
        assert_eq!(source.get("key"), Some("v1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_values() {
        let store = Arc::new(MemoryStore::new());
        store.put("/configs", "key", "v1");

        let source = Arc::new(PropertySource::new("app", true, PropertyMap::new()));
        let refresher = SourceRefresher::new(store.clone(), source.clone(), "/configs");
        refresher.refresh().await;

        // Reads of the root now fail; the source must keep serving v1.
        let broken = SourceRefresher::new(store, source.clone(), "/gone");
        broken.refresh().await;
        assert_eq!(source.get("key"), Some("v1".to_string()));
    }
}
