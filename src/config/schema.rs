//! Configuration schema definitions.
//!
//! This module defines the declarative composition input for the registry.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the registry agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Declared configuration sources, in declaration order.
    pub sources: Vec<SourceDecl>,

    /// Backing store settings.
    pub store: StoreConfig,

    /// Watch re-subscription settings.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Declaration of a single named configuration source.
///
/// Created once at bootstrap and immutable thereafter; only the live value
/// set it names is refreshed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceDecl {
    /// Source name, unique within the registry.
    pub name: String,

    /// Refresh the source automatically when the store reports a change.
    pub auto_refreshed: bool,

    /// Place this source first. If set, `before` and `after` are ignored.
    pub first: bool,

    /// Insert immediately before the named source. Wins over `after` when
    /// both are given.
    pub before: String,

    /// Insert immediately after the named source.
    pub after: String,

    /// Connection target of the backing store.
    pub connect_string: String,

    /// Root path of this source's values within the store.
    pub root_path: String,
}

impl Default for SourceDecl {
    fn default() -> Self {
        Self {
            name: String::new(),
            auto_refreshed: true,
            first: false,
            before: String::new(),
            after: String::new(),
            connect_string: "127.0.0.1:2181".to_string(),
            root_path: "/configs".to_string(),
        }
    }
}

/// Backing store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Fallback poll interval for filesystem watches, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
        }
    }
}

/// Watch re-subscription configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Maximum consecutive re-subscription attempts before giving up.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 100,
            max_delay_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_decl_defaults() {
        let decl: SourceDecl = toml::from_str("name = \"app\"").unwrap();
        assert_eq!(decl.name, "app");
        assert!(decl.auto_refreshed);
        assert!(!decl.first);
        assert_eq!(decl.before, "");
        assert_eq!(decl.after, "");
        assert_eq!(decl.connect_string, "127.0.0.1:2181");
        assert_eq!(decl.root_path, "/configs");
    }

    #[test]
    fn test_empty_config_is_valid_toml() {
        let config: RegistryConfig = toml::from_str("").unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.store.poll_interval_secs, 2);
        assert_eq!(config.watch.max_retries, 5);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_declaration() {
        let config: RegistryConfig = toml::from_str(
            r#"
            [[sources]]
            name = "overrides"
            first = true
            connect_string = "/etc/app/store"
            root_path = "/overrides"

            [[sources]]
            name = "defaults"
            auto_refreshed = false
            after = "overrides"
            connect_string = "/etc/app/store"

            [store]
            poll_interval_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.sources.len(), 2);
        assert!(config.sources[0].first);
        assert!(!config.sources[1].auto_refreshed);
        assert_eq!(config.sources[1].after, "overrides");
        assert_eq!(config.sources[1].root_path, "/configs");
        assert_eq!(config.store.poll_interval_secs, 5);
    }
}
