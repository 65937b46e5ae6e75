//! Handler registration interfaces.
//!
//! The hosting environment exposes its registered request handlers through
//! these traits; the extractor consumes them without knowing the host.

use std::sync::Arc;

/// A registered request handler exposing a name and its URL patterns.
pub trait RegisteredHandler: Send + Sync {
    /// The name the handler was registered under.
    fn name(&self) -> &str;

    /// URL patterns in registration order. May be empty for a handler
    /// that is registered but not mapped.
    fn url_patterns(&self) -> Vec<String>;
}

/// Enumerable collection of registered handlers.
pub trait HandlerRegistry {
    /// All registered handlers, in registration order.
    fn registrations(&self) -> Vec<Arc<dyn RegisteredHandler>>;
}

/// A fixed handler description, for hosts without a live container.
pub struct StaticHandler {
    name: String,
    patterns: Vec<String>,
}

impl StaticHandler {
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

impl RegisteredHandler for StaticHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn url_patterns(&self) -> Vec<String> {
        self.patterns.clone()
    }
}

/// A registry over a fixed handler list.
#[derive(Default)]
pub struct StaticRegistry {
    handlers: Vec<Arc<dyn RegisteredHandler>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handler: Arc<dyn RegisteredHandler>) {
        self.handlers.push(handler);
    }
}

impl HandlerRegistry for StaticRegistry {
    fn registrations(&self) -> Vec<Arc<dyn RegisteredHandler>> {
        self.handlers.clone()
    }
}
