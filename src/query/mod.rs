//! Package query execution and per-manager query syntax.

pub mod command;
pub mod package_manager;

pub use command::{QueryCommand, QueryOutput, QueryRunner, SystemRunner, CAPABILITY_PLACEHOLDER};
pub use package_manager::PackageManager;
