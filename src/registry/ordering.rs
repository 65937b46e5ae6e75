//! Insertion ordering for config sources.
//!
//! # Responsibilities
//! - Compute the insertion index for a new source among existing ones
//! - `first` / `before` / `after` semantics, append as the default
//!
//! # Design Decisions
//! - `first` overrides the relative directives entirely
//! - `before` is consulted ahead of `after` when both are given
//! - A directive naming an unknown source is reported to the caller; the
//!   registry decides whether that is fatal

use crate::config::SourceDecl;
use crate::registry::registry::RegistryError;

/// Which ordering directive produced a result or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Before,
    After,
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::Before => write!(f, "before"),
            Directive::After => write!(f, "after"),
        }
    }
}

/// Resolve the insertion index of `decl` within `existing`.
///
/// `existing` is the current ordered list of registered source names.
/// Returns `RegistryError::ReferenceNotFound` when a `before`/`after`
/// directive names a source that is not registered.
pub fn resolve<S: AsRef<str>>(decl: &SourceDecl, existing: &[S]) -> Result<usize, RegistryError> {
    if decl.first {
        return Ok(0);
    }

    if !decl.before.is_empty() {
        return match position_of(existing, &decl.before) {
            Some(index) => Ok(index),
            None => Err(RegistryError::ReferenceNotFound {
                source_name: decl.name.clone(),
                directive: Directive::Before,
                missing: decl.before.clone(),
            }),
        };
    }

    if !decl.after.is_empty() {
        return match position_of(existing, &decl.after) {
            Some(index) => Ok(index + 1),
            None => Err(RegistryError::ReferenceNotFound {
                source_name: decl.name.clone(),
                directive: Directive::After,
                missing: decl.after.clone(),
            }),
        };
    }

    Ok(existing.len())
}

fn position_of<S: AsRef<str>>(existing: &[S], name: &str) -> Option<usize> {
    existing.iter().position(|s| s.as_ref() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str) -> SourceDecl {
        SourceDecl {
            name: name.to_string(),
            ..SourceDecl::default()
        }
    }

    #[test]
    fn test_first_wins_over_relative_directives() {
        let mut d = decl("new");
        d.first = true;
        d.before = "b".to_string();
        d.after = "a".to_string();
        assert_eq!(resolve(&d, &["a", "b"]).unwrap(), 0);
    }

    #[test]
    fn test_before_inserts_at_target_index() {
        let mut d = decl("new");
        d.before = "b".to_string();
        assert_eq!(resolve(&d, &["a", "b", "c"]).unwrap(), 1);
    }

    #[test]
    fn test_after_inserts_past_target_index() {
        let mut d = decl("new");
        d.after = "b".to_string();
        assert_eq!(resolve(&d, &["a", "b", "c"]).unwrap(), 2);
    }

    #[test]
    fn test_before_takes_precedence_over_after() {
        let mut d = decl("new");
        d.before = "c".to_string();
        d.after = "a".to_string();
        assert_eq!(resolve(&d, &["a", "b", "c"]).unwrap(), 2);
    }

    #[test]
    fn test_no_directives_appends() {
        assert_eq!(resolve(&decl("new"), &["a", "b"]).unwrap(), 2);
        let empty: [&str; 0] = [];
        assert_eq!(resolve(&decl("new"), &empty).unwrap(), 0);
    }

    #[test]
    fn test_missing_reference_reported() {
        let mut d = decl("new");
        d.before = "ghost".to_string();
        let err = resolve(&d, &["a"]).unwrap_err();
        match err {
            RegistryError::ReferenceNotFound {
                source_name,
                directive,
                missing,
            } => {
                assert_eq!(source_name, "new");
                assert_eq!(directive, Directive::Before);
                assert_eq!(missing, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
