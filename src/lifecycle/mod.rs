//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load declarations → Validate → Connect stores → Register sources
//!     → Subscribe watches
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop subscriptions → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Force refresh of auto-refreshed sources
//! ```
//!
//! # Design Decisions
//! - Fail fast at bootstrap: any load, connect, or register error is fatal
//! - Watch subscriptions observe the shutdown broadcast at every await

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
