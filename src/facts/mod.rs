//! Package presence facts.
//!
//! # Modules
//!
//! - [`probe`] - Runs a package query and interprets it
//! - [`registry`] - Named facts owned by the host
//! - [`result`] - The tri-state fact value

pub mod probe;
pub mod registry;
pub mod result;

pub use probe::{
    probe, NotFoundMatcher, PackagePresenceProbe, MYSQL_CLIENT_CAPABILITY, MYSQL_CLIENT_FACT,
};
pub use registry::{Fact, FactRegistry};
pub use result::ProbeResult;
