//! Dependency tree construction
//!
//! - [`node`]: Tree nodes and their JSON output shape
//! - [`resolver`]: Concurrent recursive resolution against a registry

pub mod node;
pub mod resolver;

pub use node::{DependencyMap, DependencyNode, NodeState};
pub use resolver::TreeResolver;
