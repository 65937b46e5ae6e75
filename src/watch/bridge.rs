//! Watch subscription management.
//!
//! # Responsibilities
//! - Subscribe a change callback to a watched root path
//! - Deliver events serially per subscription, at least once per change
//! - Re-establish lost watches with bounded, jittered backoff
//! - Idempotent unsubscribe; prompt cancellation via a shutdown signal
//!
//! # Design Decisions
//! - One task per subscription: serialized delivery falls out of the
//!   structure instead of a lock around the callback
//! - Distinct subscriptions run concurrently with each other
//! - Exhausting the retry budget stops refresh for that subscription only;
//!   previously loaded values are untouched

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

use crate::config::WatchConfig;
use crate::observability::metrics;
use crate::store::{ChangeEvent, ConfigStore, StoreError};
use crate::watch::backoff::backoff_delay;

/// Future returned by a change callback; awaited before the next delivery.
pub type ChangeFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback invoked for every change event on a subscription.
///
/// Invocations for the same subscription never overlap.
pub type OnChange = Box<dyn FnMut(ChangeEvent) -> ChangeFuture + Send>;

/// Lifecycle state of a single subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionStatus {
    /// Delivering events, or between re-subscription attempts.
    Active,
    /// Ended by unsubscribe or a shutdown signal.
    Stopped,
    /// Retry budget exhausted; refresh has stopped for this subscription.
    Failed { retries: u32 },
}

/// Handle identifying one subscription.
pub struct WatchHandle {
    id: Uuid,
    path: String,
    status: watch::Receiver<SubscriptionStatus>,
}

impl WatchHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The root path this subscription watches.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current subscription status.
    pub fn status(&self) -> SubscriptionStatus {
        self.status.borrow().clone()
    }

    /// Status channel for callers that want to await state changes.
    pub fn status_stream(&self) -> watch::Receiver<SubscriptionStatus> {
        self.status.clone()
    }
}

struct Subscription {
    cancel: broadcast::Sender<()>,
}

/// Bridges store change notifications to refresh callbacks.
pub struct WatchBridge {
    store: Arc<dyn ConfigStore>,
    config: WatchConfig,
    subscriptions: Arc<DashMap<Uuid, Subscription>>,
}

impl WatchBridge {
    pub fn new(store: Arc<dyn ConfigStore>, config: WatchConfig) -> Self {
        Self {
            store,
            config,
            subscriptions: Arc::new(DashMap::new()),
        }
    }

    /// Subscribe `on_change` to the given root path.
    pub fn subscribe(&self, path: &str, on_change: OnChange) -> WatchHandle {
        self.subscribe_inner(path, on_change, None)
    }

    /// Subscribe with a caller-supplied cancellation signal.
    ///
    /// When the signal fires, the subscription stops before the next
    /// delivery attempt, as if unsubscribed.
    pub fn subscribe_with_shutdown(
        &self,
        path: &str,
        on_change: OnChange,
        shutdown: broadcast::Receiver<()>,
    ) -> WatchHandle {
        self.subscribe_inner(path, on_change, Some(shutdown))
    }

    /// End a subscription. Calling this twice is a no-op, not an error.
    pub fn unsubscribe(&self, handle: &WatchHandle) {
        if let Some((_, subscription)) = self.subscriptions.remove(&handle.id) {
            let _ = subscription.cancel.send(());
            tracing::debug!(path = %handle.path, id = %handle.id, "Unsubscribed");
        }
    }

    /// Number of live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    fn subscribe_inner(
        &self,
        path: &str,
        mut on_change: OnChange,
        mut external_shutdown: Option<broadcast::Receiver<()>>,
    ) -> WatchHandle {
        let id = Uuid::new_v4();
        let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
        let (status_tx, status_rx) = watch::channel(SubscriptionStatus::Active);

        self.subscriptions.insert(id, Subscription { cancel: cancel_tx });

        let store = self.store.clone();
        let config = self.config.clone();
        let subscriptions = self.subscriptions.clone();
        let task_path = path.to_string();

        tokio::spawn(async move {
            let mut attempt: u32 = 0;
            let final_status = 'outer: loop {
                match store.watch(&task_path).await {
                    Ok(mut events) => {
                        attempt = 0;
                        loop {
                            tokio::select! {
                                _ = cancel_rx.recv() => {
                                    break 'outer SubscriptionStatus::Stopped;
                                }
                                _ = recv_optional(&mut external_shutdown) => {
                                    tracing::debug!(path = %task_path, "Shutdown signal received, stopping watch");
                                    break 'outer SubscriptionStatus::Stopped;
                                }
                                event = events.recv() => match event {
                                    Some(event) => on_change(event).await,
                                    None => {
                                        tracing::warn!(path = %task_path, "Watch stream closed, re-subscribing");
                                        break;
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(path = %task_path, error = %e, "Watch subscription attempt failed");
                    }
                }

                attempt += 1;
                if attempt > config.max_retries {
                    let err = StoreError::WatchUnavailable {
                        path: task_path.clone(),
                        retries: config.max_retries,
                    };
                    tracing::error!(
                        path = %task_path,
                        error = %err,
                        "Watch retry budget exhausted; refresh stops, last known values remain"
                    );
                    metrics::record_watch_failure(&task_path);
                    break SubscriptionStatus::Failed {
                        retries: config.max_retries,
                    };
                }

                metrics::record_watch_retry(&task_path);
                let delay = backoff_delay(attempt, config.base_delay_ms, config.max_delay_ms);
                tracing::info!(
                    path = %task_path,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Re-establishing watch"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancel_rx.recv() => break 'outer SubscriptionStatus::Stopped,
                    _ = recv_optional(&mut external_shutdown) => break 'outer SubscriptionStatus::Stopped,
                }
            };

            let _ = status_tx.send(final_status);
            subscriptions.remove(&id);
        });

        WatchHandle {
            id,
            path: path.to_string(),
            status: status_rx,
        }
    }
}

async fn recv_optional(rx: &mut Option<broadcast::Receiver<()>>) {
    match rx {
        Some(rx) => {
            let _ = rx.recv().await;
        }
        None => std::future::pending().await,
    }
}
