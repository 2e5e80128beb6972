//! Runtime access through the `php` command-line binary.
//!
//! Each query starts a short-lived `php` process. A directive is overridden
//! by calling `ini_set()` (or `set_include_path()`) inside the runtime and
//! reading the value back in the same script, so the startup-only `-d`
//! switch never hides a runtime that refuses the change. The value read back
//! is what later reads of that directive return until it is restored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{ConfigSource, PlatformInfoProvider, RuntimeFacts, RuntimeSnapshot};
use crate::error::{ReqCheckError, Result};
use crate::shell::command::{display_command, execute, CommandOptions};

/// Script printing the runtime's static facts as one JSON object.
///
/// Field names match [`RuntimeFacts`]. Casts keep `false` out of string
/// fields and `(object)` keeps an empty version map a JSON object.
const FACTS_SCRIPT: &str = r#"$versions = array();
foreach (get_loaded_extensions() as $ext) {
    $v = phpversion($ext);
    if ($v !== false) { $versions[$ext] = (string) $v; }
}
echo json_encode(array(
    'version' => PHP_VERSION,
    'os' => PHP_OS,
    'sapi' => php_sapi_name(),
    'config_file_path' => (string) get_cfg_var('cfg_file_path'),
    'path_separator' => PATH_SEPARATOR,
    'timezones' => function_exists('timezone_identifiers_list') ? timezone_identifiers_list() : array(),
    'default_timezone' => (string) @date_default_timezone_get(),
    'temp_dir' => function_exists('sys_get_temp_dir') ? (string) sys_get_temp_dir() : '',
    'extensions' => get_loaded_extensions(),
    'classes' => get_declared_classes(),
    'extension_versions' => (object) $versions,
));"#;

/// Script printing one directive as JSON: a string, or `false` if unknown.
const INI_GET_SCRIPT: &str = "echo json_encode(ini_get($argv[1]));";

/// Script changing a directive with `ini_set()` and printing what the
/// runtime holds afterwards, in the format of [`INI_GET_SCRIPT`].
const INI_SET_SCRIPT: &str = "ini_set($argv[1], $argv[2]); echo json_encode(ini_get($argv[1]));";

/// Like [`INI_SET_SCRIPT`] for the include path, which has its own setter.
const INCLUDE_PATH_SET_SCRIPT: &str =
    "set_include_path($argv[2]); echo json_encode(ini_get($argv[1]));";

fn set_script(name: &str) -> &'static str {
    if name == "include_path" {
        INCLUDE_PATH_SET_SCRIPT
    } else {
        INI_SET_SCRIPT
    }
}

/// A PHP runtime reached through its command-line binary.
#[derive(Debug, Clone)]
pub struct PhpCli {
    binary: PathBuf,
    timeout: Duration,
    observed: BTreeMap<String, String>,
}

impl PhpCli {
    /// Create a handle for the given binary (a path or a name on `PATH`).
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            observed: BTreeMap::new(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Values the runtime reported after each override, by directive.
    pub fn observed(&self) -> &BTreeMap<String, String> {
        &self.observed
    }

    /// Run the binary and return its stdout, failing on a non-zero exit.
    fn run(&self, args: &[String]) -> Result<String> {
        let program = self.binary.to_string_lossy().to_string();

        let result = execute(&program, args, &CommandOptions::with_timeout(self.timeout))
            .map_err(|e| match e {
                ReqCheckError::Io(io) => ReqCheckError::PhpUnavailable {
                    path: self.binary.clone(),
                    message: io.to_string(),
                },
                other => other,
            })?;

        if !result.success {
            if !result.stderr.trim().is_empty() {
                tracing::debug!("php stderr: {}", result.stderr.trim());
            }
            return Err(ReqCheckError::CommandFailed {
                command: display_command(&program, args),
                code: result.exit_code,
            });
        }
        Ok(result.stdout)
    }

    /// Run an inline script with trailing script arguments.
    fn run_script(&self, script: &str, script_args: &[&str]) -> Result<String> {
        self.run(&script_args_for(script, script_args))
    }
}

/// Arguments running `script` inline with trailing script arguments.
fn script_args_for(script: &str, script_args: &[&str]) -> Vec<String> {
    let mut args = vec!["-r".to_string(), script.to_string()];
    if !script_args.is_empty() {
        args.push("--".to_string());
        args.extend(script_args.iter().map(|a| a.to_string()));
    }
    args
}

/// Decode the output of [`INI_GET_SCRIPT`].
fn parse_ini_value(output: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(output.trim()) {
        Ok(serde_json::Value::String(value)) => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Unreadable directive value {:?}: {}", output, e);
            None
        }
    }
}

impl ConfigSource for PhpCli {
    fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.observed.get(name) {
            return Some(value.clone());
        }
        match self.run_script(INI_GET_SCRIPT, &[name]) {
            Ok(output) => parse_ini_value(&output),
            Err(e) => {
                tracing::debug!("Could not read directive '{}': {}", name, e);
                None
            }
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        tracing::debug!("Overriding {} = {}", name, value);
        let output = self.run_script(set_script(name), &[name, value])?;
        match parse_ini_value(&output) {
            Some(observed) => {
                if observed != value {
                    tracing::debug!("{} kept {:?} instead of {:?}", name, observed, value);
                }
                self.observed.insert(name.to_string(), observed);
                Ok(())
            }
            None => Err(ReqCheckError::InvalidOutput {
                source_name: format!("{} {}", self.binary.display(), name),
                message: format!("unknown directive or unreadable value {:?}", output.trim()),
            }),
        }
    }

    fn restore(&mut self, name: &str) {
        self.observed.remove(name);
    }
}

impl PlatformInfoProvider for PhpCli {
    fn facts(&self) -> Result<RuntimeFacts> {
        let output = self.run_script(FACTS_SCRIPT, &[])?;
        serde_json::from_str(output.trim()).map_err(|e| ReqCheckError::InvalidOutput {
            source_name: format!("{} facts", self.binary.display()),
            message: e.to_string(),
        })
    }

    fn snapshot(&self) -> Result<RuntimeSnapshot> {
        let output = self.run(&["-i".to_string()])?;
        Ok(RuntimeSnapshot::parse(&output))
    }
}
