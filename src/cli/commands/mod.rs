//! Command implementations.

pub mod check;
pub mod dispatcher;
pub mod info;

pub use check::{build_report, render_report, CheckCommand};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use info::{render_info, InfoCommand};
