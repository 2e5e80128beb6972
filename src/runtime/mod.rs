//! Access to the PHP runtime being inspected.
//!
//! The checker never talks to PHP directly. It goes through three narrow
//! interfaces:
//!
//! - [`ConfigSource`] - read and override configuration directives
//! - [`PlatformInfoProvider`] - gather [`RuntimeFacts`] and the
//!   [`RuntimeSnapshot`] diagnostic dump, once, before checks run
//! - [`CapabilityRegistry`] - which extensions and classes exist
//!
//! [`PhpCli`] implements them by driving the `php` binary; [`MockRuntime`]
//! implements them in memory for tests.
//!
//! # Example
//!
//! ```
//! use ssreqcheck::runtime::{ConfigSource, MockRuntime};
//!
//! let mut runtime = MockRuntime::new().with_ini("memory_limit", "128M");
//! assert_eq!(runtime.get("memory_limit").as_deref(), Some("128M"));
//!
//! runtime.set("memory_limit", "256M").unwrap();
//! assert_eq!(runtime.get("memory_limit").as_deref(), Some("256M"));
//! ```

pub mod facts;
pub mod mock;
pub mod php;
pub mod snapshot;

pub use facts::RuntimeFacts;
pub use mock::MockRuntime;
pub use php::PhpCli;
pub use snapshot::{DumpEntry, DumpSection, DumpValue, RuntimeSnapshot};

use crate::error::Result;

/// Read and override runtime configuration directives.
pub trait ConfigSource {
    /// Current value of a directive, `None` when the directive is unknown.
    fn get(&self, name: &str) -> Option<String>;

    /// Request a new value. The runtime may silently refuse; callers that
    /// care read the value back with [`get`](Self::get).
    fn set(&mut self, name: &str, value: &str) -> Result<()>;

    /// Drop any value set through this source, returning the directive to
    /// its configured value.
    fn restore(&mut self, name: &str);
}

/// Gathers the static description of a runtime.
pub trait PlatformInfoProvider {
    fn facts(&self) -> Result<RuntimeFacts>;

    fn snapshot(&self) -> Result<RuntimeSnapshot>;
}

/// Which optional capabilities a runtime has.
pub trait CapabilityRegistry {
    /// Whether the named extension is loaded.
    fn is_loaded(&self, name: &str) -> bool;

    /// Whether the named class is declared.
    fn type_exists(&self, name: &str) -> bool;

    /// Version the runtime itself reports for an extension, if any.
    fn reported_version(&self, name: &str) -> Option<String>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &mut T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).set(name, value)
    }

    fn restore(&mut self, name: &str) {
        (**self).restore(name)
    }
}

impl<T: PlatformInfoProvider + ?Sized> PlatformInfoProvider for &mut T {
    fn facts(&self) -> Result<RuntimeFacts> {
        (**self).facts()
    }

    fn snapshot(&self) -> Result<RuntimeSnapshot> {
        (**self).snapshot()
    }
}
