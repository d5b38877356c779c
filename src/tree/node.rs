//! Resolved dependency tree nodes

use indexmap::IndexMap;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::version::error::ResolveError;

/// Child nodes keyed by package name, in manifest order
pub type DependencyMap = IndexMap<String, DependencyNode>;

/// One package occurrence in the tree
///
/// A node is only ever built once its lookup has finished, so it is either
/// fully resolved or carries the error that stopped it.
#[derive(Debug)]
pub struct DependencyNode {
    pub name: String,
    /// Constraint string this node was requested with
    pub constraint: String,
    pub state: NodeState,
}

#[derive(Debug)]
pub enum NodeState {
    Resolved {
        version: String,
        /// `None` when the package declares no dependencies,
        /// `Some` (possibly empty) otherwise
        dependencies: Option<DependencyMap>,
    },
    Failed(ResolveError),
}

impl DependencyNode {
    pub fn resolved(
        name: String,
        constraint: String,
        version: String,
        dependencies: Option<DependencyMap>,
    ) -> Self {
        Self {
            name,
            constraint,
            state: NodeState::Resolved {
                version,
                dependencies,
            },
        }
    }

    pub fn failed(name: String, constraint: String, error: ResolveError) -> Self {
        Self {
            name,
            constraint,
            state: NodeState::Failed(error),
        }
    }

    /// Resolved version, `None` for failed nodes
    pub fn version(&self) -> Option<&str> {
        match &self.state {
            NodeState::Resolved { version, .. } => Some(version),
            NodeState::Failed(_) => None,
        }
    }

    pub fn dependencies(&self) -> Option<&DependencyMap> {
        match &self.state {
            NodeState::Resolved { dependencies, .. } => dependencies.as_ref(),
            NodeState::Failed(_) => None,
        }
    }

    /// Direct child by package name
    pub fn dependency(&self, name: &str) -> Option<&DependencyNode> {
        self.dependencies().and_then(|deps| deps.get(name))
    }

    pub fn error(&self) -> Option<&ResolveError> {
        match &self.state {
            NodeState::Failed(error) => Some(error),
            NodeState::Resolved { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, NodeState::Failed(_))
    }

    /// Every failed node in the tree, depth-first in manifest order
    pub fn failures(&self) -> Vec<&DependencyNode> {
        let mut failed = Vec::new();
        self.collect_failures(&mut failed);
        failed
    }

    fn collect_failures<'a>(&'a self, failed: &mut Vec<&'a DependencyNode>) {
        if self.is_failed() {
            failed.push(self);
        }
        for child in self.dependencies().into_iter().flat_map(|deps| deps.values()) {
            child.collect_failures(failed);
        }
    }

    /// Number of nodes in the tree, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .dependencies()
            .map(|deps| deps.values().map(DependencyNode::node_count).sum())
            .unwrap_or(0)
    }

    /// Turn a failed node into its error
    pub fn into_result(self) -> Result<Self, ResolveError> {
        match self.state {
            NodeState::Failed(error) => Err(error),
            state => Ok(Self {
                name: self.name,
                constraint: self.constraint,
                state,
            }),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    constraint: &'a str,
    message: String,
}

/// `{ name, version, dependencies }`, plus `error` on failed nodes
impl Serialize for DependencyNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.state {
            NodeState::Resolved {
                version,
                dependencies,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", &self.name)?;
                map.serialize_entry("version", version)?;
                map.serialize_entry("dependencies", dependencies)?;
                map.end()
            }
            NodeState::Failed(error) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("name", &self.name)?;
                map.serialize_entry("version", &None::<String>)?;
                map.serialize_entry("dependencies", &None::<DependencyMap>)?;
                map.serialize_entry(
                    "error",
                    &ErrorBody {
                        kind: error.kind(),
                        constraint: &self.constraint,
                        message: error.to_string(),
                    },
                )?;
                map.end()
            }
        }
    }
}
