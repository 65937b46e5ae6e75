//! Named, ordered, auto-refreshing configuration source registry.

pub mod config;
pub mod endpoint;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod store;
pub mod watch;

pub use config::RegistryConfig;
pub use endpoint::{EndpointMapping, EndpointMappingExtractor};
pub use lifecycle::Shutdown;
pub use registry::SourceRegistry;
pub use watch::WatchBridge;
