//! Version layer for package dependency resolution
//!
//! This module provides the pieces the tree resolver is built from: parsing
//! constraint strings, picking a published version out of a registry catalog,
//! and fetching metadata from the npm registry.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Constraint  │────▶│  Selector   │◀────│  Registry   │
//! │  (parse)    │     │   (pick)    │     │  (fetch)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │ Registries  │
//!                                         │   (npm)     │
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`constraint`]: Constraint parsing and version ordering
//! - [`selector`]: Version selection from a catalog, one rule per qualifier
//! - [`registry`]: Registry trait for fetching metadata from remote sources
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`error`]: Error types for registry and resolution failures
//! - [`types`]: Common types like `VersionCatalog` and `VersionMetadata`

pub mod constraint;
pub mod error;
pub mod registries;
pub mod registry;
pub mod selector;
pub mod types;
