//! Common types for registry metadata

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared dependencies of one published version, name -> constraint string
///
/// Keeps the order in which the package manifest lists them.
pub type Dependencies = IndexMap<String, String>;

/// Metadata of a single published version
///
/// Only the fields the resolver needs are decoded; everything else in the
/// registry document is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Version string as reported by the registry
    #[serde(default)]
    pub version: Option<String>,
    /// `None` when the manifest declares no `dependencies` at all,
    /// which is distinct from an empty object
    #[serde(default)]
    pub dependencies: Option<Dependencies>,
}

impl VersionMetadata {
    pub fn new(version: &str, dependencies: Option<Dependencies>) -> Self {
        Self {
            version: Some(version.to_string()),
            dependencies,
        }
    }
}

/// One entry of a package catalog
///
/// Registries keep every version ever published, and old manifests do not
/// always have today's shape (array-valued `dependencies`, non-string
/// constraints). Such entries are kept as raw JSON so the rest of the catalog
/// stays usable; they only fail the lookup that selects them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CatalogEntry {
    Metadata(VersionMetadata),
    Malformed(serde_json::Value),
}

impl CatalogEntry {
    /// Decoded metadata, `None` for a malformed entry
    pub fn metadata(&self) -> Option<&VersionMetadata> {
        match self {
            CatalogEntry::Metadata(metadata) => Some(metadata),
            CatalogEntry::Malformed(_) => None,
        }
    }
}

impl From<VersionMetadata> for CatalogEntry {
    fn from(metadata: VersionMetadata) -> Self {
        CatalogEntry::Metadata(metadata)
    }
}

/// All published versions of a package, version string -> entry
///
/// Iteration order is the order the registry returned, i.e. publish order.
/// Selection rules depend on it, so the catalog is never re-sorted.
pub type VersionCatalog = IndexMap<String, CatalogEntry>;
