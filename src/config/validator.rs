//! Thresholds validation.
//!
//! Values are free text in the file; each must parse the way the check
//! using it will parse it.

use crate::checks::memory::{is_unlimited, memory_limit_bytes};
use crate::checks::Version;
use crate::config::schema::Requirements;
use crate::error::{ReqCheckError, Result};

/// A problem with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name as written in the file.
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate thresholds and return all problems found.
pub fn validate_config(requirements: &Requirements) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if requirements.product.trim().is_empty() {
        errors.push(error("product", "must not be empty".to_string()));
    }

    for (field, value) in [
        ("php_version", &requirements.php_version),
        ("strict_timezone_version", &requirements.strict_timezone_version),
        ("gd_version", &requirements.gd_version),
    ] {
        if Version::parse(value).is_none() {
            errors.push(error(field, format!("'{}' is not a version", value)));
        }
    }

    match memory_limit_bytes(&requirements.memory_minimum) {
        Some(bytes) if is_unlimited(bytes) => errors.push(error(
            "memory_minimum",
            "must be a size, not unlimited".to_string(),
        )),
        Some(_) => {}
        None => errors.push(error(
            "memory_minimum",
            format!("'{}' is not a memory size", requirements.memory_minimum),
        )),
    }

    match memory_limit_bytes(&requirements.memory_increase) {
        Some(bytes) if bytes > 0 => {}
        _ => errors.push(error(
            "memory_increase",
            format!("'{}' is not a positive memory size", requirements.memory_increase),
        )),
    }

    if requirements.include_path_probe.trim().is_empty() {
        errors.push(error("include_path_probe", "must not be empty".to_string()));
    }

    errors
}

/// Validate thresholds, failing on the first report of problems.
pub fn validate(requirements: &Requirements) -> Result<()> {
    let errors = validate_config(requirements);
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ReqCheckError::ConfigValidationError { message })
}

fn error(field: &str, message: String) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&Requirements::default()).is_empty());
    }

    #[test]
    fn collects_all_errors() {
        let requirements = Requirements {
            product: " ".to_string(),
            php_version: "latest".to_string(),
            memory_increase: "0".to_string(),
            ..Default::default()
        };
        let fields: Vec<String> = validate_config(&requirements)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["product", "php_version", "memory_increase"]);
    }

    #[test]
    fn unlimited_minimum_is_rejected() {
        let requirements = Requirements {
            memory_minimum: "-1".to_string(),
            ..Default::default()
        };
        let err = validate(&requirements).unwrap_err();
        assert!(err.to_string().contains("memory_minimum"));
    }
}
