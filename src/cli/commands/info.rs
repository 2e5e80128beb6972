//! Info command implementation.
//!
//! `ssreqcheck info` prints what the checks see: the runtime facts and the
//! parsed `phpinfo()` dump, as JSON.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::cli::args::{Cli, InfoArgs};
use crate::error::{ReqCheckError, Result};
use crate::runtime::{DumpSection, PhpCli, PlatformInfoProvider, RuntimeFacts, RuntimeSnapshot};

use super::dispatcher::{Command, CommandResult};

#[derive(Serialize)]
struct InfoDocument<'a> {
    facts: &'a RuntimeFacts,
    #[serde(flatten)]
    snapshot: &'a RuntimeSnapshot,
}

/// Render the facts and dump of `runtime` as JSON. With `section`, only
/// that section of the dump is rendered.
pub fn render_info(runtime: &dyn PlatformInfoProvider, section: Option<&str>) -> Result<String> {
    let snapshot = runtime.snapshot()?;

    let json = match section {
        Some(name) => {
            let section: &DumpSection = snapshot.section(name).ok_or_else(|| {
                ReqCheckError::Other(anyhow::anyhow!("No section named '{}' in phpinfo()", name))
            })?;
            serde_json::to_string_pretty(section)
        }
        None => {
            let facts = runtime.facts()?;
            serde_json::to_string_pretty(&InfoDocument {
                facts: &facts,
                snapshot: &snapshot,
            })
        }
    };
    json.map_err(|e| ReqCheckError::Other(e.into()))
}

/// The info command implementation.
pub struct InfoCommand {
    php: PathBuf,
    timeout: Duration,
    args: InfoArgs,
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(cli: &Cli, args: &InfoArgs) -> Self {
        Self {
            php: cli.php.clone(),
            timeout: cli.timeout(),
            args: args.clone(),
        }
    }
}

impl Command for InfoCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let runtime = PhpCli::new(&self.php, self.timeout);
        let json = render_info(&runtime, self.args.section.as_deref())?;
        writeln!(out, "{}", json)?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    fn runtime() -> MockRuntime {
        MockRuntime::new().with_version("8.1.2").with_snapshot(
            RuntimeSnapshot::empty()
                .with_entry("gd", "GD Support", "enabled")
                .with_entry("gd", "GD Version", "2.3.3"),
        )
    }

    #[test]
    fn full_info_has_facts_and_sections() {
        let json: serde_json::Value =
            serde_json::from_str(&render_info(&runtime(), None).unwrap()).unwrap();
        assert_eq!(json["facts"]["version"], "8.1.2");
        assert_eq!(json["sections"][0]["name"], "gd");
        assert_eq!(json["sections"][0]["entries"][1]["value"], "2.3.3");
    }

    #[test]
    fn single_section_ignores_case() {
        let json: serde_json::Value =
            serde_json::from_str(&render_info(&runtime(), Some("GD")).unwrap()).unwrap();
        assert_eq!(json["name"], "gd");
    }

    #[test]
    fn missing_section_is_an_error() {
        let err = render_info(&runtime(), Some("mysql")).unwrap_err();
        assert!(err.to_string().contains("mysql"));
    }

    #[test]
    fn unreachable_runtime_is_an_error() {
        assert!(render_info(&MockRuntime::unreachable(), None).is_err());
    }
}
