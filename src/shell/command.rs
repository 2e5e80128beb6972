//! Helper process execution.
//!
//! Every process the checker starts (the PHP binary, `uname`, `systeminfo`)
//! goes through [`execute`], which captures both streams and enforces a
//! deadline so a wedged helper can never stall the report.

use crate::error::{ReqCheckError, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of executing a helper process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            success: false,
        }
    }

    /// Standard output split into lines, trailing whitespace removed.
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Timeout (None = wait forever).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Render a program and its arguments for messages and logs.
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        if arg.contains(char::is_whitespace) {
            rendered.push_str(&format!("'{}'", arg));
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

/// Execute a program directly (no shell), capturing stdout and stderr.
///
/// A non-zero exit is reported as a failed [`CommandResult`], not as an
/// error. Errors are reserved for failing to start the process and for
/// exceeding the timeout, in which case the child is killed.
pub fn execute(program: &str, args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = display_command(program, args);

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    // Drain both pipes on their own threads so a chatty child (`php -i`)
    // cannot block on a full pipe while we wait for it.
    let stdout_handle = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stdout_pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_handle = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stderr_pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if let Some(timeout) = options.timeout {
            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!("Killed `{}` after {:?}", rendered, timeout);
                return Err(ReqCheckError::CommandTimedOut {
                    command: rendered,
                    seconds: timeout.as_secs(),
                });
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = String::from_utf8_lossy(&stdout_handle.join().unwrap_or_default()).to_string();
    let stderr = String::from_utf8_lossy(&stderr_handle.join().unwrap_or_default()).to_string();
    let duration = start.elapsed();

    tracing::debug!(
        "`{}` exited with {:?} in {:?}",
        rendered,
        status.code(),
        duration
    );

    if status.success() {
        Ok(CommandResult::success(stdout, stderr))
    } else {
        Ok(CommandResult::failure(status.code(), stdout, stderr))
    }
}

/// Execute a program and return its stdout lines when it exits cleanly.
///
/// Any failure (not installed, non-zero exit, timeout) yields `None`.
pub fn execute_lines(program: &str, args: &[String], timeout: Duration) -> Option<Vec<String>> {
    match execute(program, args, &CommandOptions::with_timeout(timeout)) {
        Ok(result) if result.success => Some(result.stdout_lines()),
        Ok(result) => {
            tracing::debug!(
                "`{}` exited with {:?}: {}",
                program,
                result.exit_code,
                result.stderr.trim()
            );
            None
        }
        Err(e) => {
            tracing::debug!("`{}` unavailable: {}", program, e);
            None
        }
    }
}
