//! Thresholds file loading.

use crate::config::schema::Requirements;
use crate::config::validator::validate;
use crate::error::{ReqCheckError, Result};
use std::fs;
use std::path::Path;

/// Load a thresholds file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<Requirements> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReqCheckError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReqCheckError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`Requirements`].
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<Requirements> {
    if content.trim().is_empty() {
        return Ok(Requirements::default());
    }
    serde_yaml::from_str(content).map_err(|e| ReqCheckError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Requirements for this run: the defaults, or the given file loaded and
/// validated.
pub fn load_requirements(path: Option<&Path>) -> Result<Requirements> {
    let requirements = match path {
        Some(path) => {
            tracing::debug!("Loading requirements from {}", path.display());
            load_config_file(path)?
        }
        None => Requirements::default(),
    };
    validate(&requirements)?;
    Ok(requirements)
}
