//! Registry trait for fetching package metadata from various sources

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::{VersionCatalog, VersionMetadata};

/// Trait for fetching package metadata from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the metadata of one exact version of a package
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "express" or "@types/node")
    /// * `version` - The exact version string (e.g., "1.0.0")
    async fn fetch_version(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<VersionMetadata, RegistryError>;

    /// Fetches every published version of a package
    ///
    /// # Returns
    /// * `Ok(VersionCatalog)` - Versions in the order the registry published them
    /// * `Err(RegistryError)` - If the fetch fails
    async fn fetch_catalog(&self, package_name: &str) -> Result<VersionCatalog, RegistryError>;
}
