//! Declarative configuration subsystem.
//!
//! # Data Flow
//! ```text
//! declaration file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//!     → registry bootstrap consumes SourceDecl records in order
//! ```
//!
//! # Design Decisions
//! - Declarations are immutable once loaded; only live values refresh
//! - All fields have defaults to allow minimal declarations
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ObservabilityConfig;
pub use schema::RegistryConfig;
pub use schema::SourceDecl;
pub use schema::StoreConfig;
pub use schema::WatchConfig;
