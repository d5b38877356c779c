use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure to resolve a single node of the dependency tree
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Malformed version constraint: {0:?}")]
    MalformedConstraint(String),

    #[error("No version of {name} matches {constraint:?}")]
    NoMatchingVersion { name: String, constraint: String },

    #[error("Registry unavailable for {name}: {source}")]
    UpstreamUnavailable {
        name: String,
        #[source]
        source: RegistryError,
    },
}

impl ResolveError {
    /// Stable identifier used in serialized output
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::MalformedConstraint(_) => "malformedConstraint",
            ResolveError::NoMatchingVersion { .. } => "noMatchingVersion",
            ResolveError::UpstreamUnavailable { .. } => "upstreamUnavailable",
        }
    }
}
