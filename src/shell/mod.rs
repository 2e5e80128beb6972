//! Helper process execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{display_command, execute, execute_lines, CommandOptions, CommandResult};
pub use platform::{OsFamily, LINE_ENDING};
