//! Source registry subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap (single-threaded):
//!     SourceDecl + initial PropertyMap
//!     → ordering.rs (resolve insertion index)
//!     → registry.rs (stable insert into the ordered list)
//!
//! Lookup (any thread):
//!     key → walk sources in order → first match wins
//!
//! Refresh (watch task):
//!     new PropertyMap → source.rs (atomic snapshot swap)
//!     → list order untouched
//! ```
//!
//! # Design Decisions
//! - The ordered list is frozen after bootstrap; refresh only swaps values
//! - A missing `before`/`after` reference degrades to append plus a
//!   recorded warning, never a bootstrap failure
//! - Readers are lock-free; snapshots swap atomically

pub mod ordering;
pub mod registry;
pub mod source;

pub use ordering::Directive;
pub use registry::{OrderingWarning, RegistryError, SourceRegistry};
pub use source::PropertySource;
