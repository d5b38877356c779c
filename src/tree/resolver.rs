//! Recursive dependency tree resolution
//!
//! Each node is resolved in two steps: look up its version (a direct fetch
//! for exact constraints, a catalog fetch plus selection otherwise), then
//! resolve all of its declared dependencies concurrently. Children are built
//! by their own futures and handed back to the parent when done, so no node
//! is shared between branches.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, join_all};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::tree::node::{DependencyMap, DependencyNode};
use crate::version::constraint::Constraint;
use crate::version::error::{RegistryError, ResolveError};
use crate::version::registry::Registry;
use crate::version::selector::select;
use crate::version::types::{Dependencies, VersionCatalog, VersionMetadata};

/// Resolves a package and constraint into a full dependency tree
pub struct TreeResolver {
    registry: Arc<dyn Registry>,
    /// Caps registry requests in flight; `None` means unbounded
    limiter: Option<Semaphore>,
}

impl TreeResolver {
    pub fn new(registry: Arc<dyn Registry>, config: &ResolverConfig) -> Self {
        let limiter = match config.max_concurrent_requests {
            0 => None,
            permits => Some(Semaphore::new(permits.min(Semaphore::MAX_PERMITS))),
        };

        Self { registry, limiter }
    }

    /// Resolve `name` at `constraint` and every dependency below it
    ///
    /// Failures below the root are recorded on the failing node and the rest
    /// of the tree is still returned. A failure of the root itself is
    /// returned as the error.
    pub async fn resolve(
        &self,
        name: &str,
        constraint: &str,
    ) -> Result<DependencyNode, ResolveError> {
        let root = self
            .resolve_node(name.to_string(), constraint.to_string())
            .await
            .into_result()?;

        info!(
            "Resolved {}@{} to {} nodes ({} failed)",
            name,
            constraint,
            root.node_count(),
            root.failures().len()
        );

        Ok(root)
    }

    fn resolve_node(&self, name: String, constraint: String) -> BoxFuture<'_, DependencyNode> {
        async move {
            match self.lookup(&name, &constraint).await {
                Ok((version, dependencies)) => {
                    let dependencies = match dependencies {
                        Some(dependencies) => Some(self.resolve_dependencies(dependencies).await),
                        None => None,
                    };
                    DependencyNode::resolved(name, constraint, version, dependencies)
                }
                Err(e) => {
                    warn!("Failed to resolve {}@{}: {}", name, constraint, e);
                    DependencyNode::failed(name, constraint, e)
                }
            }
        }
        .boxed()
    }

    /// Resolve all siblings concurrently; returns once every child has
    /// finished, successfully or not
    async fn resolve_dependencies(&self, dependencies: Dependencies) -> DependencyMap {
        let children = dependencies
            .into_iter()
            .map(|(name, constraint)| self.resolve_node(name, constraint));

        join_all(children)
            .await
            .into_iter()
            .map(|child| (child.name.clone(), child))
            .collect()
    }

    /// Determine the version for one node and the dependencies it declares
    async fn lookup(
        &self,
        name: &str,
        raw_constraint: &str,
    ) -> Result<(String, Option<Dependencies>), ResolveError> {
        let constraint = Constraint::parse(raw_constraint)?;

        if let Constraint::Exact(version) = &constraint {
            let requested = version.version_key();
            debug!("Fetching {}@{} directly", name, requested);

            let metadata = self
                .fetch_version(name, &requested)
                .await
                .map_err(|e| match e {
                    RegistryError::NotFound(_) => ResolveError::NoMatchingVersion {
                        name: name.to_string(),
                        constraint: raw_constraint.to_string(),
                    },
                    source => ResolveError::UpstreamUnavailable {
                        name: name.to_string(),
                        source,
                    },
                })?;

            let version = metadata.version.unwrap_or(requested);
            return Ok((version, metadata.dependencies));
        }

        debug!("Fetching catalog of {} for {:?}", name, raw_constraint);
        let catalog = self.fetch_catalog(name).await.map_err(|source| {
            ResolveError::UpstreamUnavailable {
                name: name.to_string(),
                source,
            }
        })?;

        let (version, entry) =
            select(&catalog, &constraint).ok_or_else(|| ResolveError::NoMatchingVersion {
                name: name.to_string(),
                constraint: raw_constraint.to_string(),
            })?;
        debug!("Selected {}@{} for {:?}", name, version, raw_constraint);

        let metadata = entry
            .metadata()
            .ok_or_else(|| ResolveError::UpstreamUnavailable {
                name: name.to_string(),
                source: RegistryError::InvalidResponse(format!(
                    "Malformed metadata for version {}",
                    version
                )),
            })?;

        Ok((version.to_string(), metadata.dependencies.clone()))
    }

    async fn acquire_permit(&self) -> Option<SemaphorePermit<'_>> {
        match &self.limiter {
            // never closed
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        }
    }

    async fn fetch_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<VersionMetadata, RegistryError> {
        let _permit = self.acquire_permit().await;
        self.registry.fetch_version(name, version).await
    }

    async fn fetch_catalog(&self, name: &str) -> Result<VersionCatalog, RegistryError> {
        let _permit = self.acquire_permit().await;
        self.registry.fetch_catalog(name).await
    }
}
