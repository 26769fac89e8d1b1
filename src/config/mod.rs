//! Fact configuration loading.
//!
//! Config is optional: without it the registry carries only the built-in
//! facts. A config file can add package facts or override built-in ones.

pub mod loader;
pub mod schema;

pub use loader::{
    default_candidates, discover_config, load_config, load_config_file, parse_config,
    SYSTEM_CONFIG_PATH,
};
pub use schema::{FactsConfig, ManagerSetting, PackageFactConfig};
