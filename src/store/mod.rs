//! Backing store subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap:
//!     StoreConnector::connect(connect_string)
//!     → ConfigStore::read_all(root_path)
//!     → PropertyMap (initial values for a registered source)
//!
//! Runtime:
//!     ConfigStore::watch(root_path)
//!     → stream of ChangeEvent
//!     → watch bridge re-reads and swaps the source snapshot
//! ```
//!
//! # Design Decisions
//! - The store is a trait; this crate ships a filesystem adapter and an
//!   in-memory adapter, nothing more
//! - Watch streams end on connection loss; re-subscription is owned by the
//!   watch bridge, not the store
//! - Initial connect failure is fatal: no values can be loaded without it

pub mod file;
pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Key/value snapshot of a single configuration root.
pub type PropertyMap = HashMap<String, String>;

/// A change notification for a watched root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The root path the change was observed under.
    pub path: String,
}

/// Errors raised by backing store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Initial connection to the store failed. Fatal at bootstrap.
    #[error("connection to {target} failed: {reason}")]
    Connection { target: String, reason: String },

    /// The requested root path does not exist in the store.
    #[error("root path not found: {0}")]
    PathNotFound(String),

    /// Underlying I/O failure while reading values.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A watch could not be established on the root path.
    #[error("watch setup failed for {path}: {reason}")]
    Watch { path: String, reason: String },

    /// The watch retry budget was exhausted; refresh has stopped.
    #[error("watch unavailable for {path} after {retries} retries")]
    WatchUnavailable { path: String, retries: u32 },
}

/// A connected backing store holding key/value configuration data.
#[async_trait]
pub trait ConfigStore: Send + Sync + std::fmt::Debug {
    /// Read every key/value pair under the given root path.
    async fn read_all(&self, root_path: &str) -> Result<PropertyMap, StoreError>;

    /// Subscribe to change notifications under the given root path.
    ///
    /// The returned stream closes when the store connection is lost. The
    /// caller re-establishes the watch; the store does not retry on its own.
    async fn watch(
        &self,
        root_path: &str,
    ) -> Result<mpsc::UnboundedReceiver<ChangeEvent>, StoreError>;
}

/// Factory for store connections, keyed by connect string.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Establish a connection to the store behind `connect_string`.
    async fn connect(&self, connect_string: &str) -> Result<Arc<dyn ConfigStore>, StoreError>;
}
