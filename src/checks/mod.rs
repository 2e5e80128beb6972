//! Requirement checks.
//!
//! [`EnvironmentChecker`] evaluates single requirements against a runtime.
//! The helpers it is built from live in submodules:
//!
//! - [`version`] - dotted version comparison and extension version lookup
//! - [`memory`] - memory limit strings
//! - [`scoped`] - temporary directive overrides that always restore
//! - [`system`] - host OS description
//! - [`rewrite`] - the webserver URL rewrite probe
//! - [`status`] - result types shared with the report

pub mod checker;
pub mod memory;
pub mod rewrite;
pub mod scoped;
pub mod status;
pub mod system;
pub mod version;

pub use checker::{EnvironmentChecker, DEFAULT_TIMEOUT};
pub use rewrite::{HttpProbe, ReqwestProbe};
pub use scoped::{trial_override, Observation, ScopedOverride};
pub use status::{CheckResult, FailureKind, Severity, Status};
pub use system::{CommandDescriber, FixedDescriber, SystemDescriber};
pub use version::{TableVersionLookup, Version, VersionLookup};
