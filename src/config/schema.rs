//! Thresholds file schema.
//!
//! Every field has a default, so an empty file (or no file at all) checks
//! against the stock requirements.
//!
//! ```yaml
//! product: SilverStripe
//! php_version: 5.2.0
//! strict_timezone_version: "5.3"
//! memory_minimum: 64M
//! memory_increase: 64M
//! include_path_probe: /test/path
//! gd_version: "2.0"
//! stylesheet: styles.css
//! ```

use serde::{Deserialize, Serialize};

/// Requirement thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Requirements {
    /// Product named in the page title and messages.
    pub product: String,

    /// Minimum PHP version.
    pub php_version: String,

    /// PHP version from which an unset timezone is fatal rather than a
    /// warning.
    pub strict_timezone_version: String,

    /// Minimum `memory_limit`.
    pub memory_minimum: String,

    /// Amount `memory_limit` must be raisable by at runtime.
    pub memory_increase: String,

    /// Path prepended to `include_path` to test that it can be changed.
    pub include_path_probe: String,

    /// Minimum gd version.
    pub gd_version: String,

    /// Stylesheet URL imported by the HTML page.
    pub stylesheet: String,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            product: "SilverStripe".to_string(),
            php_version: "5.2.0".to_string(),
            strict_timezone_version: "5.3".to_string(),
            memory_minimum: "64M".to_string(),
            memory_increase: "64M".to_string(),
            include_path_probe: "/test/path".to_string(),
            gd_version: "2.0".to_string(),
            stylesheet: "styles.css".to_string(),
        }
    }
}

impl Requirements {
    /// Page title.
    pub fn title(&self) -> String {
        format!("{} Requirements", self.product)
    }

    /// Directory suggested when the temp path is unusable.
    pub fn cache_dir_name(&self) -> String {
        format!("{}-cache", self.product.to_lowercase().replace(' ', "-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let requirements: Requirements = serde_yaml::from_str("{}").unwrap();
        assert_eq!(requirements, Requirements::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let requirements: Requirements =
            serde_yaml::from_str("php_version: 7.4.0\nmemory_minimum: 128M\n").unwrap();
        assert_eq!(requirements.php_version, "7.4.0");
        assert_eq!(requirements.memory_minimum, "128M");
        assert_eq!(requirements.gd_version, "2.0");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<Requirements, _> = serde_yaml::from_str("php_versoin: 7.4.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn derived_names() {
        let requirements = Requirements::default();
        assert_eq!(requirements.title(), "SilverStripe Requirements");
        assert_eq!(requirements.cache_dir_name(), "silverstripe-cache");
    }
}
