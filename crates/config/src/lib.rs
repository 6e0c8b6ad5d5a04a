//! Configuration loading and env substitution.
//!
//! Config files: `warren.toml`, `warren.yaml`, or `warren.json`
//! Searched in `./` then `~/.config/warren/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{HeartbeatConfig, RecordsConfig, ResourceConfig, WarrenConfig},
};
