//! Line rendering for terminals and browsers.

use regex::Regex;
use std::sync::LazyLock;

use super::OutputMode;
use crate::checks::{CheckResult, Status};
use crate::shell::platform::LINE_ENDING;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Strip markup tags from `text`, keeping their content.
pub fn strip_tags(text: &str) -> String {
    RE_TAG.replace_all(text, "").into_owned()
}

/// Escape a data value for inclusion in report markup.
///
/// Anything taken from the request or the runtime goes through this before
/// it is placed next to the report's own tags.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Plain text of a markup line: tags removed, escaped values restored.
fn plain_text(text: &str) -> String {
    strip_tags(text)
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Renders report lines for one output mode.
///
/// The mode is fixed at construction. Every method returns the finished
/// text, line terminator included.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    mode: OutputMode,
}

impl ReportFormatter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// A line of text. Terminals get the text without markup.
    pub fn show(&self, text: &str) -> String {
        match self.mode {
            OutputMode::Terminal => format!("{}{}", plain_text(text), LINE_ENDING),
            OutputMode::Document => format!("{}<br>{}", text, LINE_ENDING),
        }
    }

    /// A heading. `level` is clamped to 1..=6.
    pub fn heading(&self, text: &str, level: u8) -> String {
        match self.mode {
            OutputMode::Terminal => format!("** {} **{}", plain_text(text), LINE_ENDING),
            OutputMode::Document => {
                let level = level.clamp(1, 6);
                format!("<h{level}>{}</h{level}>{}", text, LINE_ENDING)
            }
        }
    }

    /// An assertion line: `PASSED: label` when it held, otherwise
    /// `FAILED: detail` for fatal checks and `WARNING: detail` for the rest.
    pub fn assertion(&self, label: &str, passed: bool, detail: &str, fatal: bool) -> String {
        let status = Status::classify(passed, fatal);
        let text = if passed { label } else { detail };
        self.show(&format!(
            "<span class=\"{}\">{}: {}</span>",
            status.as_str(),
            status.label(),
            text
        ))
    }

    /// An assertion line for a recorded result.
    pub fn assertion_for(&self, result: &CheckResult) -> String {
        self.assertion(
            &result.name,
            result.passed,
            result.message(),
            result.severity.is_fatal(),
        )
    }

    pub fn blank_line(&self) -> String {
        match self.mode {
            OutputMode::Terminal => LINE_ENDING.to_string(),
            OutputMode::Document => format!("<br>{}", LINE_ENDING),
        }
    }

    /// Page opening, empty on terminals.
    pub fn document_open(&self, title: &str, stylesheet: &str) -> String {
        match self.mode {
            OutputMode::Terminal => String::new(),
            OutputMode::Document => [
                "<html>".to_string(),
                "<head>".to_string(),
                format!("<title>{}</title>", escape_html(title)),
                "<style type=\"text/css\">".to_string(),
                format!("@import url(\"{}\");", escape_html(stylesheet)),
                "</style>".to_string(),
                "</head>".to_string(),
                "<body>".to_string(),
            ]
            .iter()
            .map(|line| format!("{}{}", line, LINE_ENDING))
            .collect(),
        }
    }

    /// Page closing, empty on terminals.
    pub fn document_close(&self) -> String {
        match self.mode {
            OutputMode::Terminal => String::new(),
            OutputMode::Document => format!("</body>{}</html>", LINE_ENDING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{FailureKind, Severity};

    fn terminal() -> ReportFormatter {
        ReportFormatter::new(OutputMode::Terminal)
    }

    fn document() -> ReportFormatter {
        ReportFormatter::new(OutputMode::Document)
    }

    #[test]
    fn show_strips_markup_on_terminal() {
        assert_eq!(
            terminal().show("PHP version at least <strong>5.2.0</strong>"),
            format!("PHP version at least 5.2.0{}", LINE_ENDING)
        );
    }

    #[test]
    fn show_appends_break_in_document() {
        assert_eq!(
            document().show("<strong>x</strong>"),
            format!("<strong>x</strong><br>{}", LINE_ENDING)
        );
    }

    #[test]
    fn heading_per_mode() {
        assert_eq!(
            terminal().heading("System information", 2),
            format!("** System information **{}", LINE_ENDING)
        );
        assert_eq!(
            document().heading("System information", 2),
            format!("<h2>System information</h2>{}", LINE_ENDING)
        );
    }

    #[test]
    fn heading_level_is_clamped() {
        assert!(document().heading("x", 0).starts_with("<h1>"));
        assert!(document().heading("x", 9).ends_with(&format!("</h6>{}", LINE_ENDING)));
    }

    #[test]
    fn assertion_statuses() {
        let f = terminal();
        assert_eq!(f.assertion("ok", true, "bad", true), format!("PASSED: ok{}", LINE_ENDING));
        assert_eq!(f.assertion("ok", false, "bad", true), format!("FAILED: bad{}", LINE_ENDING));
        assert_eq!(f.assertion("ok", false, "bad", false), format!("WARNING: bad{}", LINE_ENDING));
    }

    #[test]
    fn assertion_span_in_document() {
        assert_eq!(
            document().assertion("gd extension loaded", false, "gd extension not loaded", true),
            format!(
                "<span class=\"failed\">FAILED: gd extension not loaded</span><br>{}",
                LINE_ENDING
            )
        );
        assert!(document()
            .assertion("tidy", false, "tidy missing", false)
            .starts_with("<span class=\"warning\">WARNING: "));
    }

    #[test]
    fn assertion_for_result() {
        let result =
            CheckResult::new("opcode cache", false, Severity::Info, FailureKind::CapabilityAbsent)
                .with_detail("no opcode cache");
        assert_eq!(
            terminal().assertion_for(&result),
            format!("WARNING: no opcode cache{}", LINE_ENDING)
        );
    }

    #[test]
    fn blank_line_per_mode() {
        assert_eq!(terminal().blank_line(), LINE_ENDING);
        assert_eq!(document().blank_line(), format!("<br>{}", LINE_ENDING));
    }

    #[test]
    fn document_wrapper_only_in_document_mode() {
        assert_eq!(terminal().document_open("T", "styles.css"), "");
        assert_eq!(terminal().document_close(), "");

        let open = document().document_open("SilverStripe Requirements", "styles.css");
        assert!(open.starts_with("<html>"));
        assert!(open.contains("<title>SilverStripe Requirements</title>"));
        assert!(open.contains("@import url(\"styles.css\");"));
        assert!(open.ends_with(&format!("<body>{}", LINE_ENDING)));
        assert!(document().document_close().ends_with("</html>"));
    }

    #[test]
    fn escape_html_neutralises_markup() {
        assert_eq!(
            escape_html("<script>alert(\"x\" & 'y')</script>"),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Apache/2.4.57"), "Apache/2.4.57");
    }

    #[test]
    fn escaped_values_read_back_on_terminal() {
        let line = format!("System: {}", escape_html("<b>Mozilla</b> & co"));
        assert_eq!(
            terminal().show(&line),
            format!("System: <b>Mozilla</b> & co{}", LINE_ENDING)
        );
        assert_eq!(
            document().show(&line),
            format!("System: &lt;b&gt;Mozilla&lt;/b&gt; &amp; co<br>{}", LINE_ENDING)
        );
    }

    #[test]
    fn strip_tags_keeps_link_text() {
        assert_eq!(
            strip_tags("check <a href=\"http://x/y\">http://x/y</a> directly"),
            "check http://x/y directly"
        );
    }
}
