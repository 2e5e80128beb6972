//! The environment checker.
//!
//! [`EnvironmentChecker`] answers one question per method about the PHP
//! runtime. Answers are plain values: a missing extension is `false`, not
//! an error, so the report can always render every line.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::memory::{format_memory_bytes, is_unlimited, memory_limit_bytes};
use super::rewrite::{self, HttpProbe, ReqwestProbe};
use super::scoped::trial_override;
use super::system::{self, CommandDescriber, SystemDescriber};
use super::version::{is_at_least, TableVersionLookup, VersionLookup};
use crate::request::RequestContext;
use crate::runtime::{
    CapabilityRegistry, ConfigSource, PlatformInfoProvider, RuntimeFacts, RuntimeSnapshot,
};

/// Default bound on helper processes and the rewrite probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opcode caches in the order they are looked for: display name, extension
/// name, directive that enables it.
const OPCODE_CACHERS: &[(&str, &str, &str)] = &[
    ("XCache", "xcache", "xcache.cacher"),
    ("WinCache", "wincache", "wincache.ocenabled"),
    ("eAccelerator", "eaccelerator", "eaccelerator.enable"),
    ("APC", "apc", "apc.enabled"),
    ("Zend OPcache", "Zend OPcache", "opcache.enable"),
];

/// Distinguishes scratch directories created by one process.
static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Values a directive may hold and still count as switched off.
const FALSY_VALUES: &[&str] = &["", "0", "off", "false", "no"];

/// Evaluates requirements against one runtime.
///
/// Facts and the diagnostic dump are gathered once at construction. Only
/// the two override probes touch the runtime afterwards, and both restore
/// what they change.
pub struct EnvironmentChecker<C: ConfigSource> {
    config: C,
    facts: RuntimeFacts,
    snapshot: RuntimeSnapshot,
    describer: Option<Box<dyn SystemDescriber>>,
    http: Box<dyn HttpProbe>,
    timeout: Duration,
}

impl<C: ConfigSource> EnvironmentChecker<C> {
    /// Build a checker from facts that were already gathered.
    pub fn new(config: C, facts: RuntimeFacts, snapshot: RuntimeSnapshot) -> Self {
        Self {
            config,
            facts,
            snapshot,
            describer: None,
            http: Box::new(ReqwestProbe),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Gather facts and the diagnostic dump from `runtime`, then build a
    /// checker over it.
    ///
    /// An unreachable runtime is not an error here: the checker falls back
    /// to empty facts, every check fails, and the report says so.
    pub fn initialize(runtime: C) -> Self
    where
        C: PlatformInfoProvider,
    {
        let facts = runtime.facts().unwrap_or_else(|e| {
            tracing::warn!("Could not read runtime facts: {}", e);
            RuntimeFacts::unavailable()
        });
        let snapshot = runtime.snapshot().unwrap_or_else(|e| {
            tracing::warn!("Could not read diagnostic dump: {}", e);
            RuntimeSnapshot::empty()
        });
        tracing::debug!(
            "Runtime {} on {} with {} extensions, {} dump sections",
            facts.version_display(),
            facts.os,
            facts.extensions.len(),
            snapshot.sections().len()
        );
        Self::new(runtime, facts, snapshot)
    }

    pub fn with_describer(mut self, describer: impl SystemDescriber + 'static) -> Self {
        self.describer = Some(Box::new(describer));
        self
    }

    pub fn with_http_probe(mut self, probe: impl HttpProbe + 'static) -> Self {
        self.http = Box::new(probe);
        self
    }

    /// Bound on the rewrite probe and the OS description commands.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn facts(&self) -> &RuntimeFacts {
        &self.facts
    }

    pub fn snapshot(&self) -> &RuntimeSnapshot {
        &self.snapshot
    }

    /// Current value of a directive.
    pub fn config_value(&self, name: &str) -> Option<String> {
        self.config.get(name)
    }

    /// Whether a directive is switched off. Unknown directives count as off.
    pub fn is_config_flag_disabled(&self, flag: &str) -> bool {
        let value = self.config.get(flag).unwrap_or_default();
        let value = value.trim();
        let disabled = FALSY_VALUES
            .iter()
            .any(|falsy| value.eq_ignore_ascii_case(falsy));
        tracing::debug!("{} = {:?}, disabled = {}", flag, value, disabled);
        disabled
    }

    pub fn is_version_at_least(&self, minimum: &str) -> bool {
        is_at_least(&self.facts.version, minimum)
    }

    pub fn is_capability_present(&self, name: &str) -> bool {
        self.facts.is_loaded(name)
    }

    pub fn type_exists(&self, name: &str) -> bool {
        self.facts.type_exists(name)
    }

    /// Best-effort version of an extension.
    pub fn capability_version(&self, name: &str) -> Option<String> {
        TableVersionLookup::new(&self.facts, &self.snapshot).version_of(name)
    }

    /// Whether an extension is at least `minimum`. An extension whose
    /// version cannot be determined fails.
    pub fn is_capability_version_at_least(&self, name: &str, minimum: &str) -> bool {
        self.capability_version(name)
            .is_some_and(|version| is_at_least(&version, minimum))
    }

    /// Whether `memory_limit` is at least `minimum`. No limit passes;
    /// an unreadable limit fails.
    pub fn is_memory_at_least(&self, minimum: &str) -> bool {
        let current = self
            .config
            .get("memory_limit")
            .and_then(|value| memory_limit_bytes(&value));
        match (current, memory_limit_bytes(minimum)) {
            (Some(current), _) if is_unlimited(current) => true,
            (Some(current), Some(minimum)) => current >= minimum,
            _ => false,
        }
    }

    /// Whether `memory_limit` can be raised by `increase` at runtime.
    ///
    /// The raised value is read back and the original put back before this
    /// returns. With no limit set there is nothing to raise and the check
    /// passes without touching the runtime.
    pub fn can_raise_memory_limit(&mut self, increase: &str) -> bool {
        let Some(increase) = memory_limit_bytes(increase) else {
            return false;
        };
        let Some(original) = self
            .config
            .get("memory_limit")
            .and_then(|value| memory_limit_bytes(&value))
        else {
            return false;
        };
        if is_unlimited(original) {
            return true;
        }
        let Some(expected) = original.checked_add(increase) else {
            return false;
        };

        let observation = trial_override(&mut self.config, "memory_limit", |_| {
            Some(format_memory_bytes(expected))
        });
        let raised = observation
            .and_then(|obs| obs.observed)
            .and_then(|value| memory_limit_bytes(&value));
        tracing::debug!("memory_limit raise to {}: observed {:?}", expected, raised);
        raised == Some(expected)
    }

    /// Whether `path` can be prepended to `include_path` at runtime. The
    /// original value is restored before this returns.
    pub fn can_extend_search_path(&mut self, path: &str) -> bool {
        let separator = self.facts.separator().to_string();
        let observation = trial_override(&mut self.config, "include_path", |original| {
            Some(format!("{}{}{}", path, separator, original.unwrap_or_default()))
        });
        match observation {
            Some(obs) => obs.observed.as_deref() == Some(obs.requested.as_str()),
            None => false,
        }
    }

    /// Whether `date.timezone` names a timezone the runtime recognises.
    pub fn is_timezone_configured_and_valid(&self) -> bool {
        match self.config.get("date.timezone") {
            Some(timezone) if !timezone.trim().is_empty() => {
                self.facts.is_known_timezone(timezone.trim())
            }
            _ => false,
        }
    }

    /// Whether the webserver routes the rewrite test URL to the fixture.
    pub fn probe_url_rewrite_support(&self, request: &RequestContext) -> bool {
        rewrite::probe_url_rewrite_support(self.http.as_ref(), request, self.timeout)
    }

    /// One-line description of the host. Runs `uname -a` (`systeminfo` on
    /// Windows) unless a describer was injected.
    pub fn describe_host_system(&self, request: &RequestContext) -> String {
        match &self.describer {
            Some(describer) => system::describe_host_system(describer.as_ref(), request),
            None => {
                let describer = CommandDescriber::new(self.facts.os_family(), self.timeout);
                system::describe_host_system(&describer, request)
            }
        }
    }

    /// Name and version of the first opcode cache that is loaded and
    /// enabled.
    pub fn opcode_cacher(&self) -> Option<String> {
        OPCODE_CACHERS
            .iter()
            .find(|(_, extension, directive)| {
                self.is_capability_present(extension) && !self.is_config_flag_disabled(directive)
            })
            .map(|(label, extension, _)| {
                let version = self.capability_version(extension).unwrap_or_default();
                format!("{} {}", label, version).trim().to_string()
            })
    }

    /// Directory the runtime stores temporary files in.
    pub fn default_temp_path(&self) -> Option<PathBuf> {
        self.facts.temp_path()
    }

    /// Whether a new directory can be created in the temp path. The scratch
    /// directory is removed again.
    pub fn is_temp_path_writable(&self) -> bool {
        let Some(temp) = self.default_temp_path() else {
            return false;
        };
        let scratch = temp.join(format!(
            "ssreqcheck-test-{}-{}",
            std::process::id(),
            SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        match std::fs::create_dir(&scratch) {
            Ok(()) => {
                if let Err(e) = std::fs::remove_dir(&scratch) {
                    tracing::warn!("Could not remove {}: {}", scratch.display(), e);
                }
                true
            }
            Err(e) => {
                tracing::debug!("Cannot create {}: {}", scratch.display(), e);
                false
            }
        }
    }

    /// Give back the configuration source.
    pub fn into_config(self) -> C {
        self.config
    }
}
