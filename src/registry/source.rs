//! A single named property source.
//!
//! # Responsibilities
//! - Hold the live key/value snapshot of one configuration source
//! - Swap the whole snapshot atomically on refresh
//!
//! # Design Decisions
//! - Readers never see partial state: a refresh replaces the entire map
//! - Lock-free reads via arc-swap; refresh frequency is low, read
//!   frequency is high

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::store::PropertyMap;

/// A named, atomically refreshable key/value source.
pub struct PropertySource {
    name: String,
    auto_refreshed: bool,
    values: ArcSwap<PropertyMap>,
}

impl PropertySource {
    pub fn new(name: impl Into<String>, auto_refreshed: bool, initial: PropertyMap) -> Self {
        Self {
            name: name.into(),
            auto_refreshed,
            values: ArcSwap::from_pointee(initial),
        }
    }

    /// The registered name of this source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the watch bridge keeps this source refreshed.
    pub fn auto_refreshed(&self) -> bool {
        self.auto_refreshed
    }

    /// Look up a single key in the current snapshot.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.load().get(key).cloned()
    }

    /// The current snapshot, shared without copying.
    pub fn snapshot(&self) -> Arc<PropertyMap> {
        self.values.load_full()
    }

    /// Replace the snapshot. In-flight readers keep the old one.
    pub fn replace(&self, values: PropertyMap) {
        self.values.store(Arc::new(values));
    }

    pub fn len(&self) -> usize {
        self.values.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.load().is_empty()
    }
}

impl std::fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySource")
            .field("name", &self.name)
            .field("auto_refreshed", &self.auto_refreshed)
            .field("keys", &self.len())
            .finish()
    }
}
