//! Static facts about the runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::CapabilityRegistry;
use crate::shell::platform::OsFamily;

/// Everything about the runtime that does not change while a report is
/// produced, gathered in a single round trip before any check runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeFacts {
    /// Runtime version, e.g. `8.1.2`. Empty when unknown.
    pub version: String,
    /// OS identifier reported by the runtime, e.g. `Linux` or `WINNT`.
    pub os: String,
    /// Server API the runtime was started through, e.g. `cli`.
    pub sapi: String,
    /// Loaded configuration file, empty when none was loaded.
    pub config_file_path: String,
    /// Separator used between include path entries.
    pub path_separator: String,
    /// Timezone identifiers the runtime recognises.
    pub timezones: Vec<String>,
    /// Timezone the runtime falls back to when none is configured.
    pub default_timezone: String,
    /// Directory the runtime uses for temporary files.
    pub temp_dir: String,
    /// Names of loaded extensions.
    pub extensions: Vec<String>,
    /// Names of declared classes.
    pub classes: Vec<String>,
    /// Version strings the runtime reports for individual extensions.
    pub extension_versions: BTreeMap<String, String>,
}

impl RuntimeFacts {
    /// Facts for a runtime that could not be reached. Every check against
    /// them fails.
    pub fn unavailable() -> Self {
        Self {
            path_separator: default_path_separator().to_string(),
            ..Default::default()
        }
    }

    /// The version for display, `unknown` when missing.
    pub fn version_display(&self) -> &str {
        if self.version.is_empty() {
            "unknown"
        } else {
            &self.version
        }
    }

    pub fn os_family(&self) -> OsFamily {
        if self.os.is_empty() {
            OsFamily::current()
        } else {
            OsFamily::from_identifier(&self.os)
        }
    }

    pub fn config_file(&self) -> Option<&str> {
        non_empty(&self.config_file_path)
    }

    pub fn temp_path(&self) -> Option<PathBuf> {
        non_empty(&self.temp_dir).map(PathBuf::from)
    }

    pub fn separator(&self) -> &str {
        non_empty(&self.path_separator).unwrap_or(default_path_separator())
    }

    /// Whether `timezone` is one of the recognised identifiers.
    pub fn is_known_timezone(&self, timezone: &str) -> bool {
        self.timezones.iter().any(|tz| tz == timezone)
    }
}

impl CapabilityRegistry for RuntimeFacts {
    fn is_loaded(&self, name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(name))
    }

    fn type_exists(&self, name: &str) -> bool {
        self.classes
            .iter()
            .any(|class| class.eq_ignore_ascii_case(name))
    }

    fn reported_version(&self, name: &str) -> Option<String> {
        self.extension_versions
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(name))
            .and_then(|(_, version)| non_empty(version))
            .map(String::from)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn default_path_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}
