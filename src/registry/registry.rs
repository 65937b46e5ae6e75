//! The ordered source list.
//!
//! # Responsibilities
//! - Own the ordered collection of registered property sources
//! - Resolve insertion positions via the ordering resolver
//! - Record recoverable ordering warnings for later inspection
//! - Serve lookups across sources in precedence order
//!
//! # Design Decisions
//! - Registration happens at bootstrap on a single thread (`&mut self`);
//!   after that the list is shared immutably and only snapshots change
//! - Unresolvable `before`/`after` falls back to append and records a
//!   warning; eventual consistency is acceptable in configuration layering
//! - Duplicate names are a hard error: lookups would become ambiguous

use std::sync::Arc;

use thiserror::Error;

use crate::config::SourceDecl;
use crate::registry::ordering::{self, Directive};
use crate::registry::source::PropertySource;
use crate::store::PropertyMap;

/// Errors raised during source registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate config source name: {0}")]
    DuplicateSource(String),

    #[error("source {source_name}: {directive} directive references unknown source {missing:?}")]
    ReferenceNotFound {
        source_name: String,
        directive: Directive,
        missing: String,
    },
}

/// A recoverable ordering problem, recorded instead of raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingWarning {
    /// The source whose directive could not be resolved.
    pub source: String,
    /// The directive that failed.
    pub directive: Directive,
    /// The missing source name it referenced.
    pub missing: String,
}

/// Ordered collection of named property sources.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<PropertySource>>,
    warnings: Vec<OrderingWarning>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declared source with its initial values.
    ///
    /// The insertion position follows the declaration's ordering
    /// directives. A directive naming an unregistered source degrades to
    /// append and records a warning retrievable via [`warnings`].
    ///
    /// [`warnings`]: SourceRegistry::warnings
    pub fn register(
        &mut self,
        decl: &SourceDecl,
        initial: PropertyMap,
    ) -> Result<Arc<PropertySource>, RegistryError> {
        if self.index_of(&decl.name).is_some() {
            return Err(RegistryError::DuplicateSource(decl.name.clone()));
        }

        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        let index = match ordering::resolve(decl, &names) {
            Ok(index) => index,
            Err(RegistryError::ReferenceNotFound {
                source_name,
                directive,
                missing,
            }) => {
                tracing::warn!(
                    source = %source_name,
                    directive = %directive,
                    missing = %missing,
                    "Ordering reference not found, appending source at the end"
                );
                self.warnings.push(OrderingWarning {
                    source: source_name,
                    directive,
                    missing,
                });
                self.sources.len()
            }
            Err(other) => return Err(other),
        };

        let source = Arc::new(PropertySource::new(
            decl.name.clone(),
            decl.auto_refreshed,
            initial,
        ));
        self.sources.insert(index, source.clone());

        tracing::info!(
            source = %decl.name,
            index,
            keys = source.len(),
            auto_refreshed = decl.auto_refreshed,
            "Config source registered"
        );
        Ok(source)
    }

    /// Look up a key across all sources; the earliest source wins.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(key))
    }

    /// Current position of a source by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name() == name)
    }

    /// A registered source by name.
    pub fn get(&self, name: &str) -> Option<&Arc<PropertySource>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    /// Sources in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<PropertySource>> {
        self.sources.iter()
    }

    /// Ordering warnings recorded during registration.
    pub fn warnings(&self) -> &[OrderingWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Flattened view of all sources; earlier sources shadow later ones.
    pub fn merged(&self) -> PropertyMap {
        let mut merged = PropertyMap::new();
        for source in self.sources.iter().rev() {
            for (key, value) in source.snapshot().iter() {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}
