//! Shared test helpers

pub mod registry;

pub use registry::{FixtureRegistry, create_test_resolver, npm_fixture};
