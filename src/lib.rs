//! ssreqcheck - Server environment requirements checker for PHP hosting.
//!
//! ssreqcheck inspects a PHP runtime (version, extensions, configuration
//! flags, memory limits, URL rewriting) and reports whether it can run the
//! application. Run from a terminal it prints plain text; run as a CGI
//! program behind a webserver it serves an HTML page.
//!
//! # Modules
//!
//! - [`checks`] - Requirement checks against a runtime
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Requirement thresholds
//! - [`error`] - Error types and result aliases
//! - [`report`] - Report assembly and rendering
//! - [`request`] - CGI request context
//! - [`runtime`] - Access to the PHP runtime being inspected
//! - [`shell`] - Helper process execution
//!
//! # Example
//!
//! ```
//! use ssreqcheck::checks::EnvironmentChecker;
//! use ssreqcheck::runtime::MockRuntime;
//!
//! let runtime = MockRuntime::new()
//!     .with_version("8.1.2")
//!     .with_ini("memory_limit", "128M");
//! let mut checker = EnvironmentChecker::initialize(runtime);
//!
//! assert!(checker.is_version_at_least("5.2"));
//! assert!(checker.is_memory_at_least("64M"));
//! assert!(checker.can_raise_memory_limit("64M"));
//! assert_eq!(checker.config_value("memory_limit").as_deref(), Some("128M"));
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod request;
pub mod runtime;
pub mod shell;

pub use error::{ReqCheckError, Result};
