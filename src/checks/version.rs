//! Version parsing, comparison and lookup.
//!
//! Runtime and extension versions arrive as free text ("8.1.2-1ubuntu2",
//! "bundled (2.1.0 compatible)"). [`Version`] compares dotted numbers with
//! zero padding, and [`TableVersionLookup`] digs an extension's version
//! out of whatever the runtime exposes.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::runtime::{CapabilityRegistry, RuntimeSnapshot};

static RE_VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").unwrap());

/// A dotted numeric version.
///
/// Missing trailing segments count as zero, so `5.2` equals `5.2.0`.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    /// Parse the leading dotted numbers of `text`.
    ///
    /// Parsing stops at the first segment without leading digits; trailing
    /// text on a segment (`3-1ubuntu2`, `0RC1`) is ignored. Returns `None`
    /// if there is no number at all.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
        let mut segments = Vec::new();

        for part in text.split('.') {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            let Ok(number) = digits.parse::<u64>() else {
                break;
            };
            segments.push(number);
            if digits.len() != part.len() {
                break;
            }
        }

        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Whether `actual` is at least `minimum`. Unparseable input on either
/// side never satisfies the comparison.
pub fn is_at_least(actual: &str, minimum: &str) -> bool {
    match (Version::parse(actual), Version::parse(minimum)) {
        (Some(actual), Some(minimum)) => actual >= minimum,
        _ => false,
    }
}

/// Pull a version out of free text: the first `N.N` or `N.N.N` token, or
/// the whole value when it is purely numeric.
pub fn extract_version(value: &str) -> Option<String> {
    if let Some(token) = RE_VERSION_TOKEN.find(value) {
        return Some(token.as_str().to_string());
    }
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(trimmed.to_string());
    }
    None
}

/// Finds the version of an extension.
pub trait VersionLookup {
    fn version_of(&self, capability: &str) -> Option<String>;
}

/// Dump keys known to carry an extension's own version, where the generic
/// "first key mentioning version" rule would pick the wrong row or where
/// the runtime reports its own version instead of the library's.
const KNOWN_VERSION_KEYS: &[(&str, &str)] = &[
    ("gd", "GD Version"),
    ("curl", "cURL Information"),
    ("xcache", "XCache Version"),
    ("wincache", "WinCache Version"),
    ("tidy", "libTidy Version"),
    ("libxml", "libXML Compiled Version"),
    ("iconv", "iconv library version"),
];

/// Table-driven [`VersionLookup`].
///
/// Sources, in order:
/// 1. the dump key listed for the extension in [`KNOWN_VERSION_KEYS`]
/// 2. the first key in the extension's dump section containing "version"
/// 3. the version the runtime reports for the extension
///
/// Bundled extensions report the runtime's own version, so the dump is
/// preferred over it.
///
/// The first source yielding a version token wins.
pub struct TableVersionLookup<'a> {
    registry: &'a dyn CapabilityRegistry,
    snapshot: &'a RuntimeSnapshot,
}

impl<'a> TableVersionLookup<'a> {
    pub fn new(registry: &'a dyn CapabilityRegistry, snapshot: &'a RuntimeSnapshot) -> Self {
        Self { registry, snapshot }
    }

    fn from_known_key(&self, capability: &str) -> Option<String> {
        let (_, key) = KNOWN_VERSION_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(capability))?;
        extract_version(self.snapshot.value(capability, key)?)
    }

    fn from_registry(&self, capability: &str) -> Option<String> {
        extract_version(&self.registry.reported_version(capability)?)
    }

    fn from_dump_scan(&self, capability: &str) -> Option<String> {
        let entry = self
            .snapshot
            .section(capability)?
            .find_key_containing("version")?;
        extract_version(entry.value.primary())
    }
}

impl VersionLookup for TableVersionLookup<'_> {
    fn version_of(&self, capability: &str) -> Option<String> {
        let version = self
            .from_known_key(capability)
            .or_else(|| self.from_dump_scan(capability))
            .or_else(|| self.from_registry(capability));
        tracing::debug!("Version of {}: {:?}", capability, version);
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeFacts;

    #[test]
    fn zero_padding_makes_versions_equal() {
        assert!(is_at_least("5.2.0", "5.2"));
        assert!(is_at_least("5.2", "5.2.0"));
        assert_eq!(Version::parse("5.2").unwrap(), Version::parse("5.2.0.0").unwrap());
    }

    #[test]
    fn comparison_is_numeric_per_segment() {
        assert!(is_at_least("5.10.0", "5.9.9"));
        assert!(!is_at_least("5.1.6", "5.2.0"));
        assert!(is_at_least("8.1.2", "5.2.0"));
        assert!(!is_at_least("1.9", "2.0"));
    }

    #[test]
    fn comparison_is_reflexive_and_transitive() {
        let versions = ["5.2", "5.2.0", "5.2.1", "5.3", "5.10", "7", "8.1.2"];
        for a in versions {
            assert!(is_at_least(a, a));
            for b in versions {
                for c in versions {
                    if is_at_least(a, b) && is_at_least(b, c) {
                        assert!(is_at_least(a, c), "{} >= {} >= {}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn parse_ignores_distribution_suffixes() {
        assert_eq!(Version::parse("7.4.3-4ubuntu2").unwrap().segments(), &[7, 4, 3]);
        assert_eq!(Version::parse("5.3.0RC1").unwrap().segments(), &[5, 3, 0]);
        assert_eq!(Version::parse("v2.1").unwrap().segments(), &[2, 1]);
    }

    #[test]
    fn unparseable_versions_never_satisfy() {
        assert!(Version::parse("").is_none());
        assert!(Version::parse("bundled").is_none());
        assert!(!is_at_least("", "0"));
        assert!(!is_at_least("unknown", "1.0"));
        assert!(!is_at_least("8.1.2", "latest"));
    }

    #[test]
    fn extract_version_takes_first_token() {
        assert_eq!(extract_version("2.3.1 stable"), Some("2.3.1".to_string()));
        assert_eq!(
            extract_version("bundled (2.1.0 compatible)"),
            Some("2.1.0".to_string())
        );
        assert_eq!(extract_version("1.2 and 3.4"), Some("1.2".to_string()));
        assert_eq!(extract_version("20090626"), Some("20090626".to_string()));
        assert_eq!(extract_version("enabled"), None);
        assert_eq!(extract_version(""), None);
    }

    fn facts_with(ext: &str, version: &str) -> RuntimeFacts {
        let mut facts = RuntimeFacts::default();
        facts.extensions.push(ext.to_string());
        facts
            .extension_versions
            .insert(ext.to_string(), version.to_string());
        facts
    }

    #[test]
    fn dump_scan_finds_version_key() {
        let facts = RuntimeFacts::default();
        let snapshot = RuntimeSnapshot::empty()
            .with_entry("mylib", "mylib support", "enabled")
            .with_entry("mylib", "lib Version", "2.3.1 stable");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("mylib"), Some("2.3.1".to_string()));
    }

    #[test]
    fn dump_scan_first_matching_key_wins() {
        let facts = RuntimeFacts::default();
        let snapshot = RuntimeSnapshot::empty()
            .with_entry("mylib", "API Version", "20090626")
            .with_entry("mylib", "Library Version", "3.1.4");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("mylib"), Some("20090626".to_string()));
    }

    #[test]
    fn dump_scan_non_numeric_value_is_absent() {
        let facts = RuntimeFacts::default();
        let snapshot = RuntimeSnapshot::empty().with_entry("mylib", "Version", "unknown");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("mylib"), None);
    }

    #[test]
    fn missing_section_is_absent() {
        let facts = RuntimeFacts::default();
        let snapshot = RuntimeSnapshot::empty().with_entry("other", "Version", "1.0");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("mylib"), None);
    }

    #[test]
    fn known_key_beats_runtime_reported_version() {
        let facts = facts_with("gd", "8.1.2");
        let snapshot = RuntimeSnapshot::empty()
            .with_entry("gd", "GD Support", "enabled")
            .with_entry("gd", "GD Version", "bundled (2.1.0 compatible)");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("gd"), Some("2.1.0".to_string()));
    }

    #[test]
    fn dump_scan_beats_runtime_reported_version() {
        let facts = facts_with("apc", "3.1.9");
        let snapshot = RuntimeSnapshot::empty().with_entry("apc", "Version", "3.0.0");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("apc"), Some("3.0.0".to_string()));
    }

    #[test]
    fn reported_version_used_without_dump_version() {
        let facts = facts_with("Zend OPcache", "8.1.2");
        let snapshot = RuntimeSnapshot::empty()
            .with_entry("Zend OPcache", "Opcode Caching", "Up and Running");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("Zend OPcache"), Some("8.1.2".to_string()));
    }

    #[test]
    fn reported_version_is_cleaned() {
        let facts = facts_with("mbstring", "8.1.2-1ubuntu2.14");
        let snapshot = RuntimeSnapshot::empty();
        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("mbstring"), Some("8.1.2".to_string()));
    }

    #[test]
    fn external_gd_library_version_read_from_dump() {
        let mut facts = facts_with("gd", "8.1.2");
        facts.version = "8.1.2".to_string();
        let snapshot = RuntimeSnapshot::empty()
            .with_entry("gd", "GD Support", "enabled")
            .with_entry("gd", "GD headers Version", "2.3.3")
            .with_entry("gd", "GD library Version", "2.3.3");

        let lookup = TableVersionLookup::new(&facts, &snapshot);
        assert_eq!(lookup.version_of("gd"), Some("2.3.3".to_string()));
    }
}
