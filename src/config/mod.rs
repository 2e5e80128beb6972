//! Requirement thresholds.
//!
//! The thresholds checked against (minimum PHP version, memory sizes and
//! so on) default to the stock requirements and can be overridden with a
//! YAML file passed through `--config`.
//!
//! - Schema in [`schema`]
//! - Loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use ssreqcheck::config::{load_requirements, Requirements};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("requirements.yml");
//! fs::write(&path, "php_version: 7.4.0").unwrap();
//!
//! let requirements = load_requirements(Some(&path)).unwrap();
//! assert_eq!(requirements.php_version, "7.4.0");
//! assert_eq!(requirements.memory_minimum, Requirements::default().memory_minimum);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{load_config_file, load_requirements, parse_config};
pub use schema::Requirements;
pub use validator::{validate, validate_config, ValidationError};
