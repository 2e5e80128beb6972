//! The fixed sequence of checks.

use super::formatter::escape_html;
use super::Report;
use crate::checks::{CheckResult, EnvironmentChecker, FailureKind, Severity};
use crate::config::Requirements;
use crate::request::RequestContext;
use crate::runtime::ConfigSource;

/// Extensions every install needs, in report order. `posix` is skipped on
/// Windows hosts.
const REQUIRED_EXTENSIONS_BEFORE_GD: &[&str] = &["curl", "dom", "gd"];
const REQUIRED_EXTENSIONS_AFTER_GD: &[&str] = &[
    "hash",
    "iconv",
    "mbstring",
    "posix",
    "session",
    "tokenizer",
];

const INCLUDE_PATH_HELP: &str =
    "<a href=\"http://silverstripe.org/installing-silverstripe/show/12361\">More information in silverstripe.org/forums</a>";
const MAGIC_QUOTES_HELP: &str =
    "<a href=\"http://silverstripe.org/blog-module-forum/show/15011\">see here</a>";

/// Runs every check in report order.
pub struct ReportDriver<'a> {
    requirements: &'a Requirements,
    request: &'a RequestContext,
}

impl<'a> ReportDriver<'a> {
    pub fn new(requirements: &'a Requirements, request: &'a RequestContext) -> Self {
        Self {
            requirements,
            request,
        }
    }

    /// Evaluate every check and collect the report.
    pub fn run<C: ConfigSource>(&self, checker: &mut EnvironmentChecker<C>) -> Report {
        let mut report = Report::new(self.requirements.title(), &self.requirements.stylesheet);
        report.heading(
            format!("{} Requirements Checker", escape_html(&self.requirements.product)),
            1,
        );

        self.system_information(&mut report, checker);
        if self.request.is_present() {
            self.webserver_configuration(&mut report, checker);
        }
        self.php_configuration(&mut report, checker);
        self.extensions(&mut report, checker);
        self.opcode_cache(&mut report, checker);
        self.temp_path(&mut report, checker);

        let summary = report.summary();
        tracing::debug!(
            "Report complete: {} passed, {} warnings, {} failed",
            summary.passed,
            summary.warnings,
            summary.failed
        );
        report
    }

    fn system_information<C: ConfigSource>(
        &self,
        report: &mut Report,
        checker: &EnvironmentChecker<C>,
    ) {
        let facts = checker.facts();
        report.heading("System information", 2);
        report.line(format!(
            "System: {}",
            escape_html(&checker.describe_host_system(self.request))
        ));
        if self.request.is_present() {
            report.line(format!(
                "Webserver Software: {}",
                escape_html(self.request.server_software.as_deref().unwrap_or("Unknown"))
            ));
        }
        report.line(format!("SAPI: {}", escape_html(&facts.sapi)));
        report.line(format!("PHP Version: {}", escape_html(facts.version_display())));
        report.line(format!(
            "PHP configuration file path: {}",
            escape_html(facts.config_file().unwrap_or_default())
        ));
        report.blank();
    }

    fn webserver_configuration<C: ConfigSource>(
        &self,
        report: &mut Report,
        checker: &EnvironmentChecker<C>,
    ) {
        let url = crate::checks::rewrite::rewrite_test_url(self.request).unwrap_or_default();
        let url = escape_html(&url);
        report.heading("Webserver configuration", 2);
        report.assert(
            CheckResult::new(
                "URL rewrite support",
                checker.probe_url_rewrite_support(self.request),
                Severity::Warning,
                FailureKind::NetworkProbeFailed,
            )
            .with_detail(format!(
                "URL rewrite test failed. Please check <a href=\"{0}\">{0}</a> in your browser directly",
                url
            )),
        );
        report.blank();
    }

    fn php_configuration<C: ConfigSource>(
        &self,
        report: &mut Report,
        checker: &mut EnvironmentChecker<C>,
    ) {
        let req = self.requirements;
        let product = escape_html(&req.product);
        let version = escape_html(checker.facts().version_display());
        let memory_limit = checker.config_value("memory_limit").unwrap_or_default();
        let memory_limit = escape_html(&memory_limit);

        report.heading("PHP configuration", 2);
        report.assert(
            CheckResult::new(
                format!("PHP version at least <strong>{}</strong> ({})", req.php_version, version),
                checker.is_version_at_least(&req.php_version),
                Severity::Fatal,
                FailureKind::VersionBelowMinimum,
            )
            .with_detail(version.clone()),
        );
        report.blank();

        let memory_ok = report.assert(
            CheckResult::new(
                format!(
                    "memory_limit option at least <strong>{}</strong> ({})",
                    req.memory_minimum, memory_limit
                ),
                checker.is_memory_at_least(&req.memory_minimum),
                Severity::Warning,
                FailureKind::ConfigurationMissing,
            )
            .with_detail(format!(
                "You only have {} memory. {} requires at least <strong>{}</strong>",
                memory_limit, product, req.memory_minimum
            )),
        );
        report.assert(
            CheckResult::new(
                format!(
                    "can increase memory_limit option by {} using ini_set()",
                    req.memory_increase
                ),
                checker.can_raise_memory_limit(&req.memory_increase),
                Severity::from_fatal(!memory_ok),
                FailureKind::ConfigurationMissing,
            )
            .with_detail(format!(
                "Unable to increase memory by {}. Please make sure you set at least <strong>{}</strong> for PHP memory_limit option",
                req.memory_increase, req.memory_minimum
            )),
        );
        report.assert(
            CheckResult::new(
                "can set additional include paths using set_include_path()",
                checker.can_extend_search_path(&req.include_path_probe),
                Severity::Fatal,
                FailureKind::ConfigurationMissing,
            )
            .with_detail(format!(
                "Additional paths cannot be set using set_include_path(). {}",
                INCLUDE_PATH_HELP
            )),
        );

        let timezone = escape_html(&checker.config_value("date.timezone").unwrap_or_default());
        report.assert(
            CheckResult::new(
                format!("date.timezone option set and valid ({})", timezone),
                checker.is_timezone_configured_and_valid(),
                Severity::from_fatal(checker.is_version_at_least(&req.strict_timezone_version)),
                FailureKind::ConfigurationMissing,
            )
            .with_detail(format!(
                "date.timezone option needs to be set to your server timezone. PHP guessed <strong>{}</strong>, but it's not safe to rely on the system timezone",
                escape_html(&checker.facts().default_timezone)
            )),
        );

        let flags: [(&str, String, bool); 6] = [
            (
                "asp_tags",
                "asp_tags option should be set to <strong>Off</strong>".to_string(),
                true,
            ),
            (
                "safe_mode",
                "safe_mode option is deprecated. Please set it to <strong>Off</strong>".to_string(),
                true,
            ),
            (
                "allow_call_time_pass_reference",
                "allow_call_time_pass_reference option is deprecated. Please set it to <strong>Off</strong>"
                    .to_string(),
                false,
            ),
            (
                "short_open_tag",
                "short_open_tag option should be set to <strong>Off</strong>".to_string(),
                false,
            ),
            (
                "magic_quotes_gpc",
                format!(
                    "magic_quotes_gpc option is deprecated. This can cause issues with cookies, {} for more information. Please set it to <strong>Off</strong>",
                    MAGIC_QUOTES_HELP
                ),
                true,
            ),
            (
                "register_globals",
                "register_globals option is deprecated. Please set it to <strong>Off</strong>"
                    .to_string(),
                true,
            ),
        ];
        for (flag, detail, fatal) in flags {
            report.assert(
                CheckResult::new(
                    format!("{} option set to <strong>Off</strong>", flag),
                    checker.is_config_flag_disabled(flag),
                    Severity::from_fatal(fatal),
                    FailureKind::ConfigurationMissing,
                )
                .with_detail(detail),
            );
        }
        report.blank();
    }

    fn extensions<C: ConfigSource>(&self, report: &mut Report, checker: &EnvironmentChecker<C>) {
        let req = self.requirements;

        for name in REQUIRED_EXTENSIONS_BEFORE_GD {
            report.assert(extension_loaded(checker, name, Severity::Fatal));
        }

        let gd_version = escape_html(&checker.capability_version("gd").unwrap_or_default());
        report.assert(
            CheckResult::new(
                format!(
                    "gd extension version at least <strong>{}</strong> ({})",
                    req.gd_version, gd_version
                ),
                checker.is_capability_version_at_least("gd", &req.gd_version),
                Severity::Fatal,
                FailureKind::VersionBelowMinimum,
            )
            .with_detail(format!(
                "gd extension is too old. {} requires at least gd version {}",
                escape_html(&req.product),
                req.gd_version
            )),
        );

        let windows = checker.facts().os_family().is_windows();
        for name in REQUIRED_EXTENSIONS_AFTER_GD {
            if *name == "posix" && windows {
                continue;
            }
            report.assert(extension_loaded(checker, name, Severity::Fatal));
        }

        report.assert(extension_loaded(checker, "tidy", Severity::Warning));
        report.assert(extension_loaded(checker, "xml", Severity::Fatal));
        report.blank();
    }

    fn opcode_cache<C: ConfigSource>(&self, report: &mut Report, checker: &EnvironmentChecker<C>) {
        let cacher = checker.opcode_cacher();
        report.assert(
            CheckResult::new(
                format!(
                    "opcode cacher extension installed ({})",
                    escape_html(cacher.as_deref().unwrap_or("none"))
                ),
                cacher.is_some(),
                Severity::Info,
                FailureKind::CapabilityAbsent,
            )
            .with_detail(
                "no opcode cacher extension is installed and enabled. It is highly recommended to install and enable either XCache, WinCache, APC, eAccelerator or Zend OPcache",
            ),
        );
        report.blank();
    }

    fn temp_path<C: ConfigSource>(&self, report: &mut Report, checker: &EnvironmentChecker<C>) {
        let cache_dir = escape_html(&self.requirements.cache_dir_name());
        let product = escape_html(&self.requirements.product);
        let temp = checker.default_temp_path();
        let shown = temp
            .as_ref()
            .map(|path| escape_html(&path.display().to_string()))
            .unwrap_or_default();

        report.assert(
            CheckResult::new(
                format!("default temp path is accessible ({})", shown),
                temp.is_some(),
                Severity::Warning,
                FailureKind::ConfigurationMissing,
            )
            .with_detail(format!(
                "no default temp path found. Please create a <strong>{}</strong> directory where {} is located with webserver user write permissions",
                cache_dir, product
            )),
        );

        if temp.is_some() {
            report.assert(
                CheckResult::new(
                    "default temp path is writable, and new directories can be created",
                    checker.is_temp_path_writable(),
                    Severity::Warning,
                    FailureKind::FilesystemUnwritable,
                )
                .with_detail(format!(
                    "default temp path is not writable, new directories cannot be created. Please create a <strong>{}</strong> directory where {} is located with webserver user write permissions",
                    cache_dir, product
                )),
            );
        }
    }
}

fn extension_loaded<C: ConfigSource>(
    checker: &EnvironmentChecker<C>,
    name: &str,
    severity: Severity,
) -> CheckResult {
    CheckResult::new(
        format!("{} extension loaded", name),
        checker.is_capability_present(name),
        severity,
        FailureKind::CapabilityAbsent,
    )
    .with_detail(format!("{} extension not loaded", name))
}
