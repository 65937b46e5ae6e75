//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check name uniqueness and ordering self-references
//! - Validate connection targets and root paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - `first` combined with `before`/`after` is not an error; the relative
//!   directives are simply ignored at resolution time

use thiserror::Error;

use crate::config::schema::RegistryConfig;

/// A single semantic problem in the declared configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("source at position {0} has an empty name")]
    EmptyName(usize),

    #[error("source name declared more than once: {0}")]
    DuplicateName(String),

    #[error("source {source_name}: root path {path:?} must be non-empty and start with '/'")]
    InvalidRootPath { source_name: String, path: String },

    #[error("source {source_name}: empty connect string")]
    EmptyConnectString { source_name: String },

    #[error("source {source_name}: ordering directive {directive} references the source itself")]
    SelfReference {
        source_name: String,
        directive: &'static str,
    },
}

/// Validate the declared sources, collecting every error found.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for (position, decl) in config.sources.iter().enumerate() {
        if decl.name.is_empty() {
            errors.push(ValidationError::EmptyName(position));
        } else if !seen.insert(decl.name.as_str()) {
            errors.push(ValidationError::DuplicateName(decl.name.clone()));
        }

        if decl.root_path.is_empty() || !decl.root_path.starts_with('/') {
            errors.push(ValidationError::InvalidRootPath {
                source_name: decl.name.clone(),
                path: decl.root_path.clone(),
            });
        }

        if decl.connect_string.is_empty() {
            errors.push(ValidationError::EmptyConnectString {
                source_name: decl.name.clone(),
            });
        }

        if !decl.before.is_empty() && decl.before == decl.name {
            errors.push(ValidationError::SelfReference {
                source_name: decl.name.clone(),
                directive: "before",
            });
        }
        if !decl.after.is_empty() && decl.after == decl.name {
            errors.push(ValidationError::SelfReference {
                source_name: decl.name.clone(),
                directive: "after",
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
