//! pkgfact - Package presence facts for configuration management.
//!
//! pkgfact answers "is a package providing this capability installed?" by
//! asking the system package manager, and reports the answer as a
//! tri-state fact (`true` or absent) under a fact name such as
//! `has_installed_mysql_client`.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Optional YAML config declaring extra facts
//! - [`error`] - Error types and result aliases
//! - [`facts`] - The presence probe, fact values, and the fact registry
//! - [`query`] - Package query execution and per-manager syntax
//!
//! # Example
//!
//! ```no_run
//! use pkgfact::facts::FactRegistry;
//!
//! let registry = FactRegistry::new();
//! if let Some(value) = registry.resolve("has_installed_mysql_client") {
//!     println!("has_installed_mysql_client => {}", value);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod facts;
pub mod query;

pub use error::{FactError, Result};
pub use facts::{probe, FactRegistry, PackagePresenceProbe, ProbeResult};
