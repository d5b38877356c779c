pub mod config;
pub mod logging;
pub mod tree;
pub mod version;
