//! Check command implementation.
//!
//! `ssreqcheck check` (also the default) runs every requirement check
//! against the PHP binary and prints the report.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::checks::EnvironmentChecker;
use crate::cli::args::{CheckArgs, Cli, ReportFormat};
use crate::config::{load_requirements, Requirements};
use crate::error::{ReqCheckError, Result};
use crate::report::{OutputMode, Report, ReportDriver, ReportFormatter};
use crate::request::RequestContext;
use crate::runtime::{ConfigSource, PhpCli, PlatformInfoProvider};

use super::dispatcher::{Command, CommandResult};

/// Run every check against `runtime` and collect the report.
pub fn build_report<C>(
    runtime: C,
    requirements: &Requirements,
    request: &RequestContext,
    timeout: Duration,
) -> Report
where
    C: ConfigSource + PlatformInfoProvider,
{
    let mut checker = EnvironmentChecker::initialize(runtime).with_timeout(timeout);
    ReportDriver::new(requirements, request).run(&mut checker)
}

/// Render a report in the requested format.
pub fn render_report(
    report: &Report,
    format: ReportFormat,
    request: &RequestContext,
) -> Result<String> {
    let mode = match format {
        ReportFormat::Json => {
            return report
                .to_json()
                .map_err(|e| ReqCheckError::Other(e.into()));
        }
        ReportFormat::Auto => OutputMode::detect(request),
        ReportFormat::Text => OutputMode::Terminal,
        ReportFormat::Html => OutputMode::Document,
    };
    Ok(report.render(&ReportFormatter::new(mode)))
}

/// CGI response header for a rendered report.
pub fn cgi_header(format: ReportFormat, request: &RequestContext) -> String {
    let content_type = match format {
        ReportFormat::Json => "application/json",
        ReportFormat::Text => "text/plain; charset=utf-8",
        ReportFormat::Html => "text/html; charset=utf-8",
        ReportFormat::Auto => match OutputMode::detect(request) {
            OutputMode::Document => "text/html; charset=utf-8",
            OutputMode::Terminal => "text/plain; charset=utf-8",
        },
    };
    format!("Content-Type: {}\r\n\r\n", content_type)
}

/// The check command implementation.
pub struct CheckCommand<'a> {
    php: PathBuf,
    config: Option<PathBuf>,
    timeout: Duration,
    args: CheckArgs,
    request: &'a RequestContext,
}

impl<'a> CheckCommand<'a> {
    /// Create a new check command.
    pub fn new(cli: &Cli, args: &CheckArgs, request: &'a RequestContext) -> Self {
        Self {
            php: cli.php.clone(),
            config: cli.config.clone(),
            timeout: cli.timeout(),
            args: args.clone(),
            request,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let requirements = load_requirements(self.config.as_deref())?;
        let runtime = PhpCli::new(&self.php, self.timeout);

        let report = build_report(runtime, &requirements, self.request, self.timeout);
        let rendered = render_report(&report, self.args.format, self.request)?;

        if self.request.is_present() {
            out.write_all(cgi_header(self.args.format, self.request).as_bytes())?;
        }
        out.write_all(rendered.as_bytes())?;
        out.flush()?;

        // A browser gets the page whatever it says; only terminal runs
        // signal failure through the exit code.
        if !self.request.is_present() && report.has_fatal_failures() {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
