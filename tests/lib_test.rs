//! Library integration tests.

use ssreqcheck::checks::{CheckResult, EnvironmentChecker, FailureKind, FixedDescriber, Severity};
use ssreqcheck::cli::commands::{build_report, render_report};
use ssreqcheck::cli::ReportFormat;
use ssreqcheck::config::Requirements;
use ssreqcheck::report::{OutputMode, Report, ReportFormatter};
use ssreqcheck::request::RequestContext;
use ssreqcheck::runtime::{ConfigSource, MockRuntime};
use ssreqcheck::shell::LINE_ENDING;
use ssreqcheck::ReqCheckError;
use std::time::Duration;

#[test]
fn error_types_are_public() {
    let err = ReqCheckError::ConfigValidationError {
        message: "php_version: 'latest' is not a version".into(),
    };
    assert!(err.to_string().contains("latest"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> ssreqcheck::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn terminal_report_has_one_pass_and_one_failure() {
    let runtime = MockRuntime::new()
        .with_version("5.2.0")
        .with_ini("register_globals", "1");
    let checker = EnvironmentChecker::initialize(runtime).with_describer(FixedDescriber(None));

    let mut report = Report::new("Requirements", "styles.css");
    report.assert(CheckResult::new(
        "PHP version at least <strong>5.2</strong>",
        checker.is_version_at_least("5.2"),
        Severity::Fatal,
        FailureKind::VersionBelowMinimum,
    ));
    report.assert(
        CheckResult::new(
            "register_globals option set to <strong>Off</strong>",
            checker.is_config_flag_disabled("register_globals"),
            Severity::Fatal,
            FailureKind::ConfigurationMissing,
        )
        .with_detail(
            "register_globals option is deprecated. Please set it to <strong>Off</strong>",
        ),
    );

    let text = report.render(&ReportFormatter::new(OutputMode::Terminal));
    let lines: Vec<&str> = text
        .split_terminator(LINE_ENDING)
        .collect();

    assert_eq!(
        lines,
        vec![
            "PASSED: PHP version at least 5.2",
            "FAILED: register_globals option is deprecated. Please set it to Off",
        ]
    );
    assert!(text.ends_with(LINE_ENDING));
    assert!(!text.contains('<'));
    assert!(!text.contains('>'));
}

#[test]
fn full_report_restores_runtime_configuration() {
    let runtime = MockRuntime::new()
        .with_version("8.1.2")
        .with_ini("memory_limit", "128M")
        .with_ini("include_path", ".:/usr/share/php");
    let mut checker = EnvironmentChecker::initialize(runtime).with_describer(FixedDescriber(None));

    assert!(checker.can_raise_memory_limit("64M"));
    assert!(checker.can_extend_search_path("/test/path"));

    let runtime = checker.into_config();
    assert_eq!(runtime.get("memory_limit").as_deref(), Some("128M"));
    assert_eq!(runtime.get("include_path").as_deref(), Some(".:/usr/share/php"));
    assert!(runtime.active_overrides().is_empty());
}

#[test]
fn built_report_renders_in_every_format() {
    let runtime = MockRuntime::new()
        .with_version("8.1.2")
        .with_extension("curl", None);
    let request = RequestContext::default();
    let report = build_report(runtime, &Requirements::default(), &request, Duration::from_secs(1));

    assert!(report.results().any(|r| r.name == "curl extension loaded" && r.passed));
    assert!(report.has_fatal_failures());

    let text = render_report(&report, ReportFormat::Text, &request).unwrap();
    assert!(text.contains("PASSED: curl extension loaded"));
    assert!(text.contains("FAILED: dom extension not loaded"));

    let html = render_report(&report, ReportFormat::Html, &request).unwrap();
    assert!(html.contains("<span class=\"passed\">PASSED: curl extension loaded</span><br>"));

    let rendered = render_report(&report, ReportFormat::Json, &request).unwrap();
    let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json["items"][0]["kind"], "heading");
    assert_eq!(json["items"][0]["level"], 1);
}
