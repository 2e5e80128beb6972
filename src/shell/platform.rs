//! Platform detection helpers.

/// Line terminator of the platform the report is produced on.
pub const LINE_ENDING: &str = if cfg!(target_os = "windows") {
    "\r\n"
} else {
    "\n"
};

/// Broad operating system families the checks branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Unix,
}

impl OsFamily {
    /// Classify a runtime OS identifier such as PHP's `PHP_OS`
    /// (`Linux`, `Darwin`, `WINNT`, `WIN32`).
    pub fn from_identifier(os: &str) -> Self {
        if os.trim().to_uppercase().starts_with("WIN") {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    /// Family of the host this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, OsFamily::Windows)
    }
}
