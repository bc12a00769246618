//! Class hierarchies loaded from TOML fixtures
//!
//! A fixture declares classes, their members and the direct override edges
//! between members. `Hierarchy` turns it into one `ClassMemberScope` per
//! class, chained through supertype scopes, ready for override queries.

pub mod builder;
pub mod manifest;

pub use builder::Hierarchy;
pub use manifest::{
    parse_manifest, ClassManifest, HierarchyManifest, IntersectionManifest, MemberKind,
    MemberManifest, MemberOrigin,
};

use crate::tast::CallableKind;
use std::path::PathBuf;

/// Errors raised while loading a hierarchy fixture
#[derive(Debug)]
pub enum HierarchyError {
    /// Fixture file could not be read
    Io(PathBuf, std::io::Error),

    /// Invalid TOML or unexpected fields
    Parse(String),

    /// Two `[[class]]` entries with the same name
    DuplicateClass(String),

    /// Same member name declared twice for one class and kind
    DuplicateMember {
        class: String,
        kind: CallableKind,
        name: String,
    },

    /// Supertype or reference naming a class that is not declared
    UnknownClass(String),

    /// Reference to a member the named class does not have
    UnknownMember { kind: CallableKind, reference: String },

    /// Reference that is not of the form `Class.member` or `Class.super.member`
    InvalidReference { reference: String, reason: String },

    /// Supertype chain that loops back on itself, in walk order
    CyclicSupertypes(Vec<String>),

    /// `[[class.intersection]]` in a class with no supertypes
    IntersectionWithoutSupertypes { class: String, name: String },
}

impl std::fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HierarchyError::Io(path, e) => write!(f, "cannot read '{}': {}", path.display(), e),
            HierarchyError::Parse(e) => write!(f, "invalid hierarchy fixture: {}", e),
            HierarchyError::DuplicateClass(name) => write!(f, "class '{}' is declared twice", name),
            HierarchyError::DuplicateMember { class, kind, name } => {
                write!(f, "{} '{}' is declared twice in class '{}'", kind, name, class)
            }
            HierarchyError::UnknownClass(name) => write!(f, "unknown class '{}'", name),
            HierarchyError::UnknownMember { kind, reference } => {
                write!(f, "unknown {} '{}'", kind, reference)
            }
            HierarchyError::InvalidReference { reference, reason } => {
                write!(f, "invalid member reference '{}': {}", reference, reason)
            }
            HierarchyError::CyclicSupertypes(chain) => {
                write!(f, "cyclic supertypes: {}", chain.join(" -> "))
            }
            HierarchyError::IntersectionWithoutSupertypes { class, name } => write!(
                f,
                "class '{}' declares intersection member '{}' but has no supertypes",
                class, name
            ),
        }
    }
}

impl std::error::Error for HierarchyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HierarchyError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Parsed `Class.member` / `Class.super.member` reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef<'a> {
    pub class: &'a str,
    pub member: &'a str,
    /// Refers to an intersection member in the class's supertype scope
    pub through_super: bool,
}

impl<'a> MemberRef<'a> {
    /// Split a reference. Class names may themselves be dotted; the member
    /// name is always the last segment.
    pub fn parse(reference: &'a str) -> Result<Self, HierarchyError> {
        let invalid = |reason: &str| HierarchyError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.to_string(),
        };

        let (qualifier, member) = reference
            .rsplit_once('.')
            .ok_or_else(|| invalid("expected 'Class.member'"))?;
        if member.is_empty() {
            return Err(invalid("missing member name"));
        }

        let (class, through_super) = match qualifier.strip_suffix(".super") {
            Some(class) => (class, true),
            None => (qualifier, false),
        };
        if class.is_empty() || class == "super" {
            return Err(invalid("missing class name"));
        }

        Ok(Self {
            class,
            member,
            through_super,
        })
    }
}

impl std::fmt::Display for MemberRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.through_super {
            write!(f, "{}.super.{}", self.class, self.member)
        } else {
            write!(f, "{}.{}", self.class, self.member)
        }
    }
}
