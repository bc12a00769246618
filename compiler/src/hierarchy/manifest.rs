//! TOML format for class hierarchy fixtures.
//!
//! ```toml
//! [[class]]
//! name = "Child"
//! supertypes = ["Left", "Right"]
//!
//! [[class.intersection]]
//! kind = "function"
//! name = "run"
//! merges = ["Left.run", "Right.run"]
//!
//! [[class.function]]
//! name = "run"
//! overrides = ["Child.super.run"]
//! ```

use super::HierarchyError;
use crate::tast::CallableOrigin;
use serde::Deserialize;

/// A whole fixture file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyManifest {
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassManifest>,
}

/// `[[class]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassManifest {
    pub name: String,
    /// Direct supertypes, in declaration order
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Nested classifier names
    #[serde(default)]
    pub classifiers: Vec<String>,
    #[serde(default, rename = "function")]
    pub functions: Vec<MemberManifest>,
    #[serde(default, rename = "property")]
    pub properties: Vec<MemberManifest>,
    /// Synthetic members merging several inherited ones
    #[serde(default, rename = "intersection")]
    pub intersections: Vec<IntersectionManifest>,
}

/// `[[class.function]]` / `[[class.property]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberManifest {
    pub name: String,
    #[serde(default)]
    pub origin: MemberOrigin,
    /// References to the members this one directly overrides
    #[serde(default)]
    pub overrides: Vec<String>,
}

/// Origins a fixture may declare; intersection overrides have their own table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberOrigin {
    #[default]
    Source,
    Library,
    SubstitutionOverride,
    Delegated,
}

impl From<MemberOrigin> for CallableOrigin {
    fn from(origin: MemberOrigin) -> Self {
        match origin {
            MemberOrigin::Source => CallableOrigin::Source,
            MemberOrigin::Library => CallableOrigin::Library,
            MemberOrigin::SubstitutionOverride => CallableOrigin::SubstitutionOverride,
            MemberOrigin::Delegated => CallableOrigin::Delegated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKind {
    Function,
    Property,
}

/// `[[class.intersection]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntersectionManifest {
    pub kind: MemberKind,
    pub name: String,
    /// References to the inherited members being merged
    pub merges: Vec<String>,
}

/// Parse a fixture from TOML text
pub fn parse_manifest(content: &str) -> Result<HierarchyManifest, HierarchyError> {
    toml::from_str(content).map_err(|e| HierarchyError::Parse(e.to_string()))
}
