//! Report assembly and rendering.
//!
//! [`ReportDriver`] runs the fixed sequence of checks into a [`Report`].
//! The report is then rendered line by line through a [`ReportFormatter`]
//! or serialized as JSON.
//!
//! # Example
//!
//! ```
//! use ssreqcheck::checks::{CheckResult, FailureKind, Severity};
//! use ssreqcheck::report::{OutputMode, Report, ReportFormatter};
//!
//! let mut report = Report::new("Requirements", "styles.css");
//! report.heading("PHP configuration", 2);
//! report.assert(CheckResult::new(
//!     "safe_mode option set to Off",
//!     false,
//!     Severity::Fatal,
//!     FailureKind::ConfigurationMissing,
//! ));
//!
//! let text = report.render(&ReportFormatter::new(OutputMode::Terminal));
//! assert!(text.contains("FAILED: safe_mode option set to Off"));
//! assert!(report.has_fatal_failures());
//! ```

pub mod driver;
pub mod formatter;

pub use driver::ReportDriver;
pub use formatter::{escape_html, strip_tags, ReportFormatter};

use serde::Serialize;

use crate::checks::{CheckResult, Status};
use crate::request::RequestContext;

/// Where the report is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Plain text for a terminal.
    Terminal,
    /// An HTML page for a browser.
    Document,
}

impl OutputMode {
    /// Document when the process serves a request, terminal otherwise.
    pub fn detect(request: &RequestContext) -> Self {
        if request.is_present() {
            OutputMode::Document
        } else {
            OutputMode::Terminal
        }
    }
}

/// One element of a report, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportItem {
    Heading { text: String, level: u8 },
    Line { text: String },
    Blank,
    Assertion(CheckResult),
}

/// Counts of results by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

/// An ordered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    pub stylesheet: String,
    pub items: Vec<ReportItem>,
}

impl Report {
    pub fn new(title: impl Into<String>, stylesheet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            stylesheet: stylesheet.into(),
            items: Vec::new(),
        }
    }

    pub fn heading(&mut self, text: impl Into<String>, level: u8) {
        self.items.push(ReportItem::Heading {
            text: text.into(),
            level,
        });
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.items.push(ReportItem::Line { text: text.into() });
    }

    pub fn blank(&mut self) {
        self.items.push(ReportItem::Blank);
    }

    /// Record a result. Returns whether it passed.
    pub fn assert(&mut self, result: CheckResult) -> bool {
        let passed = result.passed;
        tracing::debug!("{} {}", result.status().label(), result.name);
        self.items.push(ReportItem::Assertion(result));
        passed
    }

    /// All recorded results in order.
    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.items.iter().filter_map(|item| match item {
            ReportItem::Assertion(result) => Some(result),
            _ => None,
        })
    }

    pub fn has_fatal_failures(&self) -> bool {
        self.results().any(CheckResult::is_fatal_failure)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for result in self.results() {
            match result.status() {
                Status::Passed => summary.passed += 1,
                Status::Warning => summary.warnings += 1,
                Status::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// Render the whole report, page wrapper included.
    pub fn render(&self, formatter: &ReportFormatter) -> String {
        let mut out = formatter.document_open(&self.title, &self.stylesheet);
        for item in &self.items {
            let rendered = match item {
                ReportItem::Heading { text, level } => formatter.heading(text, *level),
                ReportItem::Line { text } => formatter.show(text),
                ReportItem::Blank => formatter.blank_line(),
                ReportItem::Assertion(result) => formatter.assertion_for(result),
            };
            out.push_str(&rendered);
        }
        out.push_str(&formatter.document_close());
        out
    }

    /// The report as pretty-printed JSON, with a summary of statuses.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            #[serde(flatten)]
            report: &'a Report,
            summary: Summary,
        }

        serde_json::to_string_pretty(&JsonReport {
            report: self,
            summary: self.summary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{FailureKind, Severity};
    use crate::shell::platform::LINE_ENDING;

    fn sample() -> Report {
        let mut report = Report::new("Requirements", "styles.css");
        report.heading("PHP configuration", 2);
        report.assert(CheckResult::new(
            "PHP version at least <strong>5.2.0</strong> (8.1.2)",
            true,
            Severity::Fatal,
            FailureKind::VersionBelowMinimum,
        ));
        report.assert(
            CheckResult::new(
                "safe_mode option set to <strong>Off</strong>",
                false,
                Severity::Fatal,
                FailureKind::ConfigurationMissing,
            )
            .with_detail("safe_mode option is deprecated. Please set it to <strong>Off</strong>"),
        );
        report.assert(CheckResult::new(
            "tidy extension loaded",
            false,
            Severity::Warning,
            FailureKind::CapabilityAbsent,
        ));
        report.blank();
        report
    }

    #[test]
    fn detect_mode_from_request() {
        assert_eq!(OutputMode::detect(&RequestContext::default()), OutputMode::Terminal);
        assert_eq!(
            OutputMode::detect(&RequestContext::for_host("localhost")),
            OutputMode::Document
        );
    }

    #[test]
    fn summary_counts_statuses() {
        let report = sample();
        assert_eq!(
            report.summary(),
            Summary {
                passed: 1,
                warnings: 1,
                failed: 1
            }
        );
        assert!(report.has_fatal_failures());
    }

    #[test]
    fn warnings_alone_are_not_fatal() {
        let mut report = Report::new("t", "s");
        report.assert(CheckResult::new(
            "x",
            false,
            Severity::Warning,
            FailureKind::CapabilityAbsent,
        ));
        assert!(!report.has_fatal_failures());
    }

    #[test]
    fn terminal_render_has_no_markup() {
        let text = sample().render(&ReportFormatter::new(OutputMode::Terminal));
        let lines: Vec<&str> = text.split(LINE_ENDING).collect();

        assert_eq!(lines[0], "** PHP configuration **");
        assert_eq!(lines[1], "PASSED: PHP version at least 5.2.0 (8.1.2)");
        assert_eq!(lines[2], "FAILED: safe_mode option is deprecated. Please set it to Off");
        assert_eq!(lines[3], "WARNING: tidy extension loaded");
        assert!(!text.contains('<'));
    }

    #[test]
    fn document_render_is_wrapped() {
        let html = sample().render(&ReportFormatter::new(OutputMode::Document));
        assert!(html.starts_with("<html>"));
        assert!(html.contains("<h2>PHP configuration</h2>"));
        assert!(html.contains("<span class=\"passed\">PASSED: "));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn json_includes_items_and_summary() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["title"], "Requirements");
        assert_eq!(json["items"][0]["kind"], "heading");
        assert_eq!(json["items"][1]["kind"], "assertion");
        assert_eq!(json["items"][1]["passed"], true);
        assert_eq!(json["items"][4]["kind"], "blank");
        assert_eq!(json["summary"]["failed"], 1);
    }
}
