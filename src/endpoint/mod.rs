//! Endpoint mapping subsystem.
//!
//! # Data Flow
//! ```text
//! Host registration state (handlers + URL patterns)
//!     → registration.rs (enumeration traits)
//!     → extractor.rs (derive mapping records)
//!     → EndpointMapping (name, ordered patterns, handler reference)
//! ```
//!
//! # Design Decisions
//! - Extraction is a pure read; nothing is cached here
//! - A handler without patterns produces no mapping, not an empty one
//! - Pattern order and duplicates are preserved; dedup policy belongs to
//!   the registration layer

pub mod extractor;
pub mod mapping;
pub mod registration;

pub use extractor::EndpointMappingExtractor;
pub use mapping::EndpointMapping;
pub use registration::{HandlerRegistry, RegisteredHandler, StaticHandler, StaticRegistry};
