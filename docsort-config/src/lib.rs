//! Shared configuration helpers for docsort hosts.
//!
//! Loads the sort registry from a TOML/JSON file, inline JSON, or the
//! conventional default locations, and installs the tracing subscriber the
//! way our binaries do.

pub mod loader;
pub mod logging;

pub use loader::{RegistryConfig, RegistrySource};
pub use logging::init_tracing;
