//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use dep_tree::config::ResolverConfig;
use dep_tree::tree::TreeResolver;
use dep_tree::version::error::RegistryError;
use dep_tree::version::registry::Registry;
use dep_tree::version::types::{CatalogEntry, Dependencies, VersionCatalog, VersionMetadata};

/// In-memory registry serving fixed catalogs
///
/// Tracks how many fetches are in flight so tests can observe the fan-out.
#[derive(Default)]
pub struct FixtureRegistry {
    catalogs: HashMap<String, VersionCatalog>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: AtomicUsize,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `version` of `package` declaring `dependencies` (an empty
    /// slice publishes `"dependencies": {}`)
    ///
    /// Versions keep the order they are added in.
    pub fn with_version(self, package: &str, version: &str, dependencies: &[(&str, &str)]) -> Self {
        let dependencies = dependencies
            .iter()
            .map(|(name, constraint)| (name.to_string(), constraint.to_string()))
            .collect::<Dependencies>();
        self.publish(package, VersionMetadata::new(version, Some(dependencies)))
    }

    /// Publish versions without a `dependencies` field
    pub fn with_versions(mut self, package: &str, versions: &[&str]) -> Self {
        for version in versions {
            self = self.publish(package, VersionMetadata::new(version, None));
        }
        self
    }

    fn publish(mut self, package: &str, metadata: VersionMetadata) -> Self {
        let version = metadata.version.clone().unwrap_or_default();
        self.catalogs
            .entry(package.to_string())
            .or_default()
            .insert(version, metadata.into());
        self
    }

    /// Publish `version` of `package` with a manifest that does not decode
    pub fn with_malformed_version(mut self, package: &str, version: &str) -> Self {
        self.catalogs
            .entry(package.to_string())
            .or_default()
            .insert(
                version.to_string(),
                CatalogEntry::Malformed(serde_json::json!({"dependencies": ["legacy"]})),
            );
        self
    }

    /// Hold every fetch for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn track<T>(&self, answer: T) -> T {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        answer
    }
}

#[async_trait]
impl Registry for FixtureRegistry {
    async fn fetch_version(
        &self,
        package_name: &str,
        version: &str,
    ) -> Result<VersionMetadata, RegistryError> {
        let answer = self
            .catalogs
            .get(package_name)
            .and_then(|catalog| catalog.get(version))
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
            .and_then(|entry| {
                entry.metadata().cloned().ok_or_else(|| {
                    RegistryError::InvalidResponse(format!("Malformed metadata for {}", version))
                })
            });
        self.track(answer).await
    }

    async fn fetch_catalog(&self, package_name: &str) -> Result<VersionCatalog, RegistryError> {
        let answer = self
            .catalogs
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()));
        self.track(answer).await
    }
}

/// Create a tree resolver over `registry` allowing `max_concurrent_requests`
/// fetches at once
pub fn create_test_resolver(
    registry: Arc<FixtureRegistry>,
    max_concurrent_requests: usize,
) -> TreeResolver {
    TreeResolver::new(
        registry,
        &ResolverConfig {
            max_concurrent_requests,
        },
    )
}

/// A slice of real npm metadata around express@1.0.0 and react@16.13.0,
/// versions listed in publish order
pub fn npm_fixture() -> FixtureRegistry {
    FixtureRegistry::new()
        .with_version("express", "0.14.0", &[("connect", "0.2.0")])
        .with_version("express", "1.0.0", &[("connect", "0.3.0")])
        .with_versions("connect", &["0.2.0", "0.3.0", "0.5.0"])
        .with_version(
            "react",
            "16.13.0",
            &[
                ("loose-envify", "^1.1.0"),
                ("object-assign", "^4.1.1"),
                ("prop-types", "^15.6.2"),
            ],
        )
        .with_version("loose-envify", "1.0.0", &[("js-tokens", "^1.0.1")])
        .with_version("loose-envify", "1.1.0", &[("js-tokens", "^1.0.1")])
        .with_version("loose-envify", "1.2.0", &[("js-tokens", "^1.0.1")])
        .with_version("loose-envify", "1.3.0", &[("js-tokens", "^2.0.0")])
        .with_version("loose-envify", "1.3.1", &[("js-tokens", "^3.0.0")])
        .with_version("loose-envify", "1.4.0", &[("js-tokens", "^3.0.0 || ^4.0.0")])
        .with_versions(
            "js-tokens",
            &[
                "1.0.0", "1.0.1", "1.0.2", "1.0.3", "2.0.0", "3.0.0", "3.0.1", "3.0.2", "4.0.0",
            ],
        )
        .with_versions("object-assign", &["4.0.0", "4.0.1", "4.1.0", "4.1.1"])
        .with_version(
            "prop-types",
            "15.6.2",
            &[("loose-envify", "^1.3.1"), ("object-assign", "^4.1.1")],
        )
        .with_version(
            "prop-types",
            "15.7.2",
            &[
                ("loose-envify", "^1.4.0"),
                ("object-assign", "^4.1.1"),
                ("react-is", "^16.8.1"),
            ],
        )
        .with_versions("react-is", &["16.8.1", "16.12.0", "16.13.0", "16.13.1"])
}
