//! Check result types.
//!
//! Each assertion produces a [`CheckResult`]. A failing check is a value,
//! never an error: the report renders it and moves on to the next one.

use serde::Serialize;
use std::fmt;

/// How much a failing check matters. Chosen per check by the report
/// driver, never computed by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The application cannot run until this is fixed.
    Fatal,
    /// The application runs, degraded.
    Warning,
    /// A recommendation.
    Info,
}

impl Severity {
    /// Severity from the fatal/non-fatal flag used when rendering.
    pub fn from_fatal(fatal: bool) -> Self {
        if fatal {
            Severity::Fatal
        } else {
            Severity::Warning
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

/// Rendered outcome of a check. Exactly one applies to any result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Warning,
    Failed,
}

impl Status {
    /// Three-way classification of a result.
    pub fn classify(passed: bool, fatal: bool) -> Self {
        match (passed, fatal) {
            (true, _) => Status::Passed,
            (false, true) => Status::Failed,
            (false, false) => Status::Warning,
        }
    }

    /// Lowercase name, used as the HTML class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Warning => "warning",
            Status::Failed => "failed",
        }
    }

    /// Uppercase label that prefixes each report line.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Passed => "PASSED",
            Status::Warning => "WARNING",
            Status::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A directive is missing or has the wrong value.
    ConfigurationMissing,
    /// An extension or class is not available.
    CapabilityAbsent,
    /// A version is too old or could not be determined.
    VersionBelowMinimum,
    /// The rewrite probe got no usable answer.
    NetworkProbeFailed,
    /// A directory could not be created.
    FilesystemUnwritable,
}

/// The outcome of a single named assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// What was asserted, shown when the check passes.
    pub name: String,
    /// Whether the assertion held.
    pub passed: bool,
    /// How much a failure matters.
    pub severity: Severity,
    /// What to show instead of the name when the check does not pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Failure category, set only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl CheckResult {
    /// Record an assertion. `kind` is kept only if the assertion failed.
    pub fn new(
        name: impl Into<String>,
        passed: bool,
        severity: Severity,
        kind: FailureKind,
    ) -> Self {
        Self {
            name: name.into(),
            passed,
            severity,
            detail: None,
            failure: if passed { None } else { Some(kind) },
        }
    }

    /// Attach the message shown on failure.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn status(&self) -> Status {
        Status::classify(self.passed, self.severity.is_fatal())
    }

    /// Text for the report line: the name on pass, the detail otherwise.
    pub fn message(&self) -> &str {
        if self.passed {
            &self.name
        } else {
            self.detail.as_deref().unwrap_or(&self.name)
        }
    }

    /// Whether this result blocks the application from running.
    pub fn is_fatal_failure(&self) -> bool {
        self.status() == Status::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_combinations() {
        assert_eq!(Status::classify(true, true), Status::Passed);
        assert_eq!(Status::classify(true, false), Status::Passed);
        assert_eq!(Status::classify(false, true), Status::Failed);
        assert_eq!(Status::classify(false, false), Status::Warning);
    }

    #[test]
    fn status_names() {
        assert_eq!(Status::Passed.as_str(), "passed");
        assert_eq!(Status::Warning.as_str(), "warning");
        assert_eq!(Status::Failed.as_str(), "failed");
        assert_eq!(Status::Failed.label(), "FAILED");
        assert_eq!(Status::Warning.to_string(), "warning");
    }

    #[test]
    fn failure_kind_dropped_on_pass() {
        let result = CheckResult::new(
            "gd extension loaded",
            true,
            Severity::Fatal,
            FailureKind::CapabilityAbsent,
        );
        assert!(result.failure.is_none());
        assert_eq!(result.status(), Status::Passed);
    }

    #[test]
    fn message_switches_on_outcome() {
        let passed =
            CheckResult::new("x loaded", true, Severity::Fatal, FailureKind::CapabilityAbsent)
                .with_detail("x not loaded");
        assert_eq!(passed.message(), "x loaded");

        let failed =
            CheckResult::new("x loaded", false, Severity::Fatal, FailureKind::CapabilityAbsent)
                .with_detail("x not loaded");
        assert_eq!(failed.message(), "x not loaded");
        assert_eq!(failed.failure, Some(FailureKind::CapabilityAbsent));
        assert!(failed.is_fatal_failure());
    }

    #[test]
    fn message_without_detail_falls_back_to_name() {
        let failed = CheckResult::new(
            "tidy loaded",
            false,
            Severity::Warning,
            FailureKind::CapabilityAbsent,
        );
        assert_eq!(failed.message(), "tidy loaded");
        assert_eq!(failed.status(), Status::Warning);
        assert!(!failed.is_fatal_failure());
    }

    #[test]
    fn info_failures_render_as_warnings() {
        let result =
            CheckResult::new("opcode cache", false, Severity::Info, FailureKind::CapabilityAbsent);
        assert_eq!(result.status(), Status::Warning);
    }

    #[test]
    fn severity_from_fatal() {
        assert_eq!(Severity::from_fatal(true), Severity::Fatal);
        assert_eq!(Severity::from_fatal(false), Severity::Warning);
    }

    #[test]
    fn serializes_snake_case() {
        let result = CheckResult::new(
            "safe_mode off",
            false,
            Severity::Fatal,
            FailureKind::ConfigurationMissing,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["severity"], "fatal");
        assert_eq!(json["failure"], "configuration_missing");
        assert!(json.get("detail").is_none());
    }
}
