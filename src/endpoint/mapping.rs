//! Endpoint mapping record.

use std::sync::Arc;

use crate::endpoint::registration::RegisteredHandler;

/// Association between a registered handler and the URL patterns it serves.
///
/// `patterns` is non-empty by construction; the extractor yields no mapping
/// for an unmapped handler.
#[derive(Clone)]
pub struct EndpointMapping {
    source: String,
    patterns: Vec<String>,
    handler: Arc<dyn RegisteredHandler>,
}

impl EndpointMapping {
    pub(crate) fn new(
        source: String,
        patterns: Vec<String>,
        handler: Arc<dyn RegisteredHandler>,
    ) -> Self {
        debug_assert!(!patterns.is_empty());
        Self {
            source,
            patterns,
            handler,
        }
    }

    /// The owning handler's registered name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// URL patterns in registration order, duplicates preserved.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// The registered handler this mapping was derived from.
    pub fn handler(&self) -> &Arc<dyn RegisteredHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for EndpointMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointMapping")
            .field("source", &self.source)
            .field("patterns", &self.patterns)
            .finish()
    }
}
