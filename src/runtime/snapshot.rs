//! Diagnostic dump parsing.
//!
//! `phpinfo()` is the most complete description a PHP runtime gives of
//! itself, but it is meant for humans. [`RuntimeSnapshot`] scrapes it into
//! section → key → value form so version heuristics can query it. Both the
//! HTML page served through a webserver and the plain text printed by
//! `php -i` are understood.
//!
//! # Example
//!
//! ```
//! use ssreqcheck::runtime::RuntimeSnapshot;
//!
//! let dump = "gd\n\nGD Support => enabled\nGD Version => bundled (2.1.0 compatible)\n";
//! let snapshot = RuntimeSnapshot::parse(dump);
//! assert_eq!(
//!     snapshot.value("gd", "GD Version"),
//!     Some("bundled (2.1.0 compatible)")
//! );
//! ```

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::LazyLock;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(RE_ANY_TAG, r"</?([A-Za-z][A-Za-z0-9]*)[^>]*>");
lazy_regex!(RE_CELL, r"<(?:th|td)[^>]*>([^<]+)</(?:th|td)>");
lazy_regex!(RE_SECTION, r"<h2>([^<]+)</h2>");
lazy_regex!(
    RE_THREE_COLUMNS,
    r"<info>([^<]+)</info>\s*<info>([^<]+)</info>\s*<info>([^<]+)</info>"
);
lazy_regex!(RE_TWO_COLUMNS, r"<info>([^<]+)</info>\s*<info>([^<]+)</info>");

/// Name given to rows that appear before the first section heading.
pub const GENERAL_SECTION: &str = "General";

/// First line of the text form; a title, not a section.
const PHPINFO_BANNER: &str = "phpinfo()";

/// Column separator in the text form of the dump.
const TEXT_SEPARATOR: &str = " => ";

/// A value in the diagnostic dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DumpValue {
    /// Two-column row: key and value.
    Single(String),
    /// Three-column row: directive, local value, master value.
    Pair { local: String, master: String },
}

impl DumpValue {
    /// The value that is in effect: the single value, or the local one.
    pub fn primary(&self) -> &str {
        match self {
            DumpValue::Single(value) => value,
            DumpValue::Pair { local, .. } => local,
        }
    }
}

/// One key/value row of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    pub key: String,
    pub value: DumpValue,
}

/// A named section of the dump, usually one per extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpSection {
    pub name: String,
    pub entries: Vec<DumpEntry>,
}

impl DumpSection {
    /// Look up a key exactly.
    pub fn get(&self, key: &str) -> Option<&DumpValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// First entry whose key contains `needle`, ignoring case.
    pub fn find_key_containing(&self, needle: &str) -> Option<&DumpEntry> {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.key.to_lowercase().contains(&needle))
    }

    fn upsert(&mut self, key: String, value: DumpValue) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(existing) => existing.value = value,
            None => self.entries.push(DumpEntry { key, value }),
        }
    }
}

/// Parsed diagnostic dump of the runtime.
///
/// Built once before any check runs and read-only afterwards. Section
/// order and row order follow the dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeSnapshot {
    sections: Vec<DumpSection>,
}

impl RuntimeSnapshot {
    /// An empty snapshot, used when the runtime could not be dumped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse either dump form, detected by the presence of section headings.
    pub fn parse(dump: &str) -> Self {
        if dump.contains("<h2") {
            Self::parse_html(dump)
        } else {
            Self::parse_text(dump)
        }
    }

    /// Parse the HTML page produced by `phpinfo()` under a webserver.
    ///
    /// Only `<h2>` section headings and table cells matter; every other tag
    /// is dropped first so each table row collapses onto one line.
    pub fn parse_html(html: &str) -> Self {
        let stripped = RE_ANY_TAG.replace_all(html, |caps: &Captures| {
            match caps[1].to_lowercase().as_str() {
                "h2" | "th" | "td" => caps[0].to_string(),
                _ => String::new(),
            }
        });
        let cells = RE_CELL.replace_all(&stripped, "<info>$1</info>");

        let mut snapshot = Self::default();
        let headings: Vec<_> = RE_SECTION.captures_iter(&cells).collect();
        for (index, heading) in headings.iter().enumerate() {
            let (Some(whole), Some(name)) = (heading.get(0), heading.get(1)) else {
                continue;
            };
            let body_end = headings
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(cells.len());
            let body = &cells[whole.end()..body_end];
            let section = decode_entities(name.as_str().trim());

            for line in body.lines() {
                if let Some(row) = RE_THREE_COLUMNS.captures(line) {
                    if row[1].trim() == "Directive" {
                        continue;
                    }
                    snapshot.insert(
                        &section,
                        &decode_entities(row[1].trim()),
                        DumpValue::Pair {
                            local: decode_entities(row[2].trim()),
                            master: decode_entities(row[3].trim()),
                        },
                    );
                } else if let Some(row) = RE_TWO_COLUMNS.captures(line) {
                    snapshot.insert(
                        &section,
                        &decode_entities(row[1].trim()),
                        DumpValue::Single(decode_entities(row[2].trim())),
                    );
                }
            }
        }
        snapshot
    }

    /// Parse the plain text printed by `php -i`.
    ///
    /// A line without a column separator that follows a blank line starts
    /// a new section. Rows before the first section go to
    /// [`GENERAL_SECTION`].
    pub fn parse_text(text: &str) -> Self {
        let mut snapshot = Self::default();
        let mut section = GENERAL_SECTION.to_string();
        let mut after_blank = true;

        for raw in text.lines() {
            let line = raw.trim_end();
            if line.trim().is_empty() {
                after_blank = true;
                continue;
            }

            if line.contains(TEXT_SEPARATOR) {
                let columns: Vec<&str> = line.split(TEXT_SEPARATOR).map(str::trim).collect();
                let key = columns[0];
                if key.is_empty() || key == "Directive" {
                    after_blank = false;
                    continue;
                }
                let value = if columns.len() >= 3 {
                    DumpValue::Pair {
                        local: columns[1].to_string(),
                        master: columns[2..].join(TEXT_SEPARATOR),
                    }
                } else {
                    DumpValue::Single(columns[1].to_string())
                };
                snapshot.insert(&section, key, value);
            } else if after_blank && line.trim() != PHPINFO_BANNER {
                section = line.trim().to_string();
            }
            after_blank = false;
        }
        snapshot
    }

    /// Add or replace a row, creating the section if needed.
    pub fn insert(&mut self, section: &str, key: &str, value: DumpValue) {
        let index = match self.sections.iter().position(|s| s.name == section) {
            Some(index) => index,
            None => {
                self.sections.push(DumpSection {
                    name: section.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        self.sections[index].upsert(key.to_string(), value);
    }

    /// Builder-style [`insert`](Self::insert) of a two-column row.
    pub fn with_entry(mut self, section: &str, key: &str, value: &str) -> Self {
        self.insert(section, key, DumpValue::Single(value.to_string()));
        self
    }

    /// Look up a section by name, ignoring case.
    pub fn section(&self, name: &str) -> Option<&DumpSection> {
        self.sections
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }

    /// The effective value of `key` in `section`.
    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key).map(DumpValue::primary)
    }

    pub fn sections(&self) -> &[DumpSection] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
