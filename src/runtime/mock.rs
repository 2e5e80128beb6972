//! In-memory runtime for testing.
//!
//! `MockRuntime` implements every runtime interface from fixed data and
//! records the directive writes made through it, so tests can assert that
//! scoped overrides were undone.
//!
//! # Example
//!
//! ```
//! use ssreqcheck::runtime::{CapabilityRegistry, MockRuntime, PlatformInfoProvider};
//!
//! let runtime = MockRuntime::new()
//!     .with_version("8.1.2")
//!     .with_extension("gd", Some("2.3.3"));
//!
//! let facts = runtime.facts().unwrap();
//! assert!(facts.is_loaded("gd"));
//! assert_eq!(facts.reported_version("gd").as_deref(), Some("2.3.3"));
//! ```

use std::collections::{BTreeMap, HashSet};

use super::{ConfigSource, PlatformInfoProvider, RuntimeFacts, RuntimeSnapshot};
use crate::error::{ReqCheckError, Result};

/// In-memory runtime.
#[derive(Debug, Clone, Default)]
pub struct MockRuntime {
    facts: RuntimeFacts,
    snapshot: RuntimeSnapshot,
    configured: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
    ignored: HashSet<String>,
    denied: HashSet<String>,
    writes: Vec<(String, String)>,
    unreachable: bool,
}

impl MockRuntime {
    /// A runtime with no facts, directives or extensions.
    pub fn new() -> Self {
        Self {
            facts: RuntimeFacts {
                os: "Linux".to_string(),
                sapi: "cli".to_string(),
                path_separator: ":".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A runtime whose provider calls fail, as if PHP were not installed.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.facts.version = version.to_string();
        self
    }

    pub fn with_os(mut self, os: &str) -> Self {
        self.facts.os = os.to_string();
        self
    }

    /// Set a directive's configured value.
    pub fn with_ini(mut self, name: &str, value: &str) -> Self {
        self.configured.insert(name.to_string(), value.to_string());
        self
    }

    /// Load an extension, optionally with a reported version.
    pub fn with_extension(mut self, name: &str, version: Option<&str>) -> Self {
        self.facts.extensions.push(name.to_string());
        if let Some(version) = version {
            self.facts
                .extension_versions
                .insert(name.to_string(), version.to_string());
        }
        self
    }

    pub fn with_class(mut self, name: &str) -> Self {
        self.facts.classes.push(name.to_string());
        self
    }

    pub fn with_timezones(mut self, timezones: &[&str]) -> Self {
        self.facts.timezones = timezones.iter().map(|tz| tz.to_string()).collect();
        self
    }

    pub fn with_temp_dir(mut self, path: &str) -> Self {
        self.facts.temp_dir = path.to_string();
        self
    }

    pub fn with_snapshot(mut self, snapshot: RuntimeSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Accept writes to a directive but keep its value, like a host that
    /// disables runtime changes.
    pub fn ignoring_writes_to(mut self, name: &str) -> Self {
        self.ignored.insert(name.to_string());
        self
    }

    /// Reject writes to a directive with an error.
    pub fn denying_writes_to(mut self, name: &str) -> Self {
        self.denied.insert(name.to_string());
        self
    }

    /// Every `set` call made, in order.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    /// Directives currently overridden.
    pub fn active_overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }
}

impl ConfigSource for MockRuntime {
    fn get(&self, name: &str) -> Option<String> {
        self.overrides
            .get(name)
            .or_else(|| self.configured.get(name))
            .cloned()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.writes.push((name.to_string(), value.to_string()));
        if self.denied.contains(name) {
            return Err(ReqCheckError::Other(anyhow::anyhow!(
                "{} cannot be changed at runtime",
                name
            )));
        }
        if !self.ignored.contains(name) {
            self.overrides.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn restore(&mut self, name: &str) {
        self.overrides.remove(name);
    }
}

impl PlatformInfoProvider for MockRuntime {
    fn facts(&self) -> Result<RuntimeFacts> {
        if self.unreachable {
            return Err(ReqCheckError::PhpUnavailable {
                path: "php".into(),
                message: "mock runtime is unreachable".to_string(),
            });
        }
        Ok(self.facts.clone())
    }

    fn snapshot(&self) -> Result<RuntimeSnapshot> {
        if self.unreachable {
            return Err(ReqCheckError::PhpUnavailable {
                path: "php".into(),
                message: "mock runtime is unreachable".to_string(),
            });
        }
        Ok(self.snapshot.clone())
    }
}
