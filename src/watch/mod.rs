//! Watch subsystem.
//!
//! # Data Flow
//! ```text
//! store change notification
//!     → bridge.rs (per-subscription task, serialized delivery)
//!     → refresher.rs (re-read root, atomic snapshot swap)
//!
//! On stream loss:
//!     bridge.rs re-subscribes
//!     → backoff.rs (bounded, jittered delay)
//!     → budget exhausted: subscription fails, values stay
//! ```
//!
//! # Design Decisions
//! - Callbacks for one subscription never overlap; the refresh logic is
//!   not required to be reentrant-safe
//! - A subscription failure is isolated: other subscriptions and all
//!   loaded values are unaffected

pub mod backoff;
pub mod bridge;
pub mod refresher;

pub use bridge::{OnChange, SubscriptionStatus, WatchBridge, WatchHandle};
pub use refresher::SourceRefresher;
