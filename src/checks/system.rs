//! Host system description.

use std::time::Duration;

use crate::request::RequestContext;
use crate::shell::command::execute_lines;
use crate::shell::platform::OsFamily;

/// Shown when nothing better is known about the host.
pub const UNKNOWN_SYSTEM: &str = "Unknown";

/// Column where `systeminfo` values start.
const SYSTEMINFO_VALUE_COLUMN: usize = 25;

/// Produces a one-line description of the host operating system.
pub trait SystemDescriber {
    /// A description, or `None` when the host could not be identified.
    fn describe(&self) -> Option<String>;
}

/// Describes the host by running `uname -a`, or `systeminfo` on Windows.
#[derive(Debug, Clone)]
pub struct CommandDescriber {
    os: OsFamily,
    timeout: Duration,
}

impl CommandDescriber {
    pub fn new(os: OsFamily, timeout: Duration) -> Self {
        Self { os, timeout }
    }

    fn describe_windows(&self) -> Option<String> {
        let lines = execute_lines("systeminfo", &[], self.timeout)?;
        non_empty(summarize_systeminfo(&lines))
    }

    fn describe_unix(&self) -> Option<String> {
        let lines = execute_lines("uname", &["-a".to_string()], self.timeout)?;
        non_empty(lines.first()?.trim().to_string())
    }
}

impl SystemDescriber for CommandDescriber {
    fn describe(&self) -> Option<String> {
        if self.os.is_windows() {
            self.describe_windows()
        } else {
            self.describe_unix()
        }
    }
}

/// A describer that always answers the same, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct FixedDescriber(pub Option<String>);

impl SystemDescriber for FixedDescriber {
    fn describe(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Join the values of the `systeminfo` lines that mention the OS.
pub fn summarize_systeminfo(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|line| line.contains("OS"))
        .map(|line| {
            line.chars()
                .skip(SYSTEMINFO_VALUE_COLUMN)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe the host, falling back to the client's user agent and finally
/// to [`UNKNOWN_SYSTEM`]. Never fails.
pub fn describe_host_system(describer: &dyn SystemDescriber, request: &RequestContext) -> String {
    describer
        .describe()
        .or_else(|| request.user_agent.clone())
        .unwrap_or_else(|| UNKNOWN_SYSTEM.to_string())
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describer_output_wins() {
        let describer = FixedDescriber(Some("Linux web01 6.1.0".to_string()));
        let request = RequestContext {
            user_agent: Some("Mozilla/5.0".to_string()),
            ..Default::default()
        };
        assert_eq!(describe_host_system(&describer, &request), "Linux web01 6.1.0");
    }

    #[test]
    fn falls_back_to_user_agent() {
        let request = RequestContext {
            user_agent: Some("Mozilla/5.0".to_string()),
            ..Default::default()
        };
        assert_eq!(
            describe_host_system(&FixedDescriber(None), &request),
            "Mozilla/5.0"
        );
    }

    #[test]
    fn falls_back_to_unknown() {
        assert_eq!(
            describe_host_system(&FixedDescriber(None), &RequestContext::default()),
            "Unknown"
        );
    }

    #[test]
    fn systeminfo_keeps_os_lines() {
        let lines: Vec<String> = [
            "Host Name:                 WEB01",
            "OS Name:                   Microsoft Windows Server 2019 Standard",
            "OS Version:                10.0.17763 N/A Build 17763",
            "System Manufacturer:       VMware, Inc.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            summarize_systeminfo(&lines),
            "Microsoft Windows Server 2019 Standard 10.0.17763 N/A Build 17763"
        );
    }

    #[test]
    fn systeminfo_short_lines_are_skipped() {
        let lines = vec!["OS".to_string()];
        assert_eq!(summarize_systeminfo(&lines), "");
    }

    #[cfg(unix)]
    #[test]
    fn uname_describes_unix_hosts() {
        let describer = CommandDescriber::new(OsFamily::Unix, Duration::from_secs(5));
        let description = describer.describe();
        assert!(description.is_some_and(|d| !d.is_empty()));
    }
}
