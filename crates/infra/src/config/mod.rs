//! Configuration loading
//!
//! Builds a [`ClientConfig`](pokitdok_domain::ClientConfig) from environment
//! variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_env, load_from_file, probe_config_paths};
