//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (refresh and watch counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with source/path fields on every event
//! - Metrics are cheap (atomic increments)
//! - The metrics endpoint is optional and off the hot path

pub mod logging;
pub mod metrics;
