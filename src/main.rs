//! ssreqcheck CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use ssreqcheck::cli::{Cli, CommandDispatcher};
use ssreqcheck::request::RequestContext;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit code for errors in the tool itself rather than in the environment.
const TOOL_ERROR_EXIT: u8 = 2;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr; stdout carries the report.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ssreqcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ssreqcheck=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("ssreqcheck starting with args: {:?}", cli);

    let request = RequestContext::from_env();
    if request.is_present() {
        tracing::debug!("Serving request for {:?}", request.host);
    }

    let dispatcher = CommandDispatcher::new(request);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match dispatcher.dispatch(&cli, &mut out) {
        Ok(result) => ExitCode::from(result.exit_code),
        Err(e) => {
            let _ = out.flush();
            eprintln!("Error: {}", e);
            ExitCode::from(TOOL_ERROR_EXIT)
        }
    }
}
