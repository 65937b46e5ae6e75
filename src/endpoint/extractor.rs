//! Mapping extraction from registered handlers.
//!
//! # Responsibilities
//! - Derive an `EndpointMapping` from a single registered handler
//! - Enumerate a whole registry, skipping unmapped handlers
//!
//! # Design Decisions
//! - Purely a read/transform; no caching, no side effects
//! - Zero patterns yields `None` rather than an empty mapping

use std::sync::Arc;

use crate::endpoint::mapping::EndpointMapping;
use crate::endpoint::registration::{HandlerRegistry, RegisteredHandler};

/// Derives mapping records from handler registrations.
#[derive(Debug, Default)]
pub struct EndpointMappingExtractor;

impl EndpointMappingExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Derive the mapping for one handler, or `None` if it has no patterns.
    pub fn extract(&self, handler: &Arc<dyn RegisteredHandler>) -> Option<EndpointMapping> {
        let patterns = handler.url_patterns();
        if patterns.is_empty() {
            return None;
        }
        Some(EndpointMapping::new(
            handler.name().to_string(),
            patterns,
            handler.clone(),
        ))
    }

    /// Derive mappings for every mapped handler in the registry.
    pub fn extract_all(&self, registry: &dyn HandlerRegistry) -> Vec<EndpointMapping> {
        registry
            .registrations()
            .iter()
            .filter_map(|handler| self.extract(handler))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::registration::{StaticHandler, StaticRegistry};

    fn handler(name: &str, patterns: &[&str]) -> Arc<dyn RegisteredHandler> {
        Arc::new(StaticHandler::new(name, patterns.iter().copied()))
    }

    #[test]
    fn test_extract_preserves_pattern_order() {
        let extractor = EndpointMappingExtractor::new();
        let mapping = extractor.extract(&handler("api", &["/a", "/b"])).unwrap();

        assert_eq!(mapping.source(), "api");
        assert_eq!(mapping.patterns(), &["/a".to_string(), "/b".to_string()]);
    }

    #[test]
    fn test_extract_unmapped_handler_yields_none() {
        let extractor = EndpointMappingExtractor::new();
        assert!(extractor.extract(&handler("idle", &[])).is_none());
    }

    #[test]
    fn test_extract_preserves_duplicates() {
        let extractor = EndpointMappingExtractor::new();
        let mapping = extractor
            .extract(&handler("api", &["/a", "/a", "/b"]))
            .unwrap();
        assert_eq!(mapping.patterns().len(), 3);
        assert_eq!(mapping.patterns()[1], "/a");
    }

    #[test]
    fn test_extract_all_skips_unmapped() {
        let mut registry = StaticRegistry::new();
        registry.add(handler("api", &["/api"]));
        registry.add(handler("idle", &[]));
        registry.add(handler("static", &["/assets", "/favicon.ico"]));

        let extractor = EndpointMappingExtractor::new();
        let mappings = extractor.extract_all(&registry);

        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].source(), "api");
        assert_eq!(mappings[1].source(), "static");
    }
}
