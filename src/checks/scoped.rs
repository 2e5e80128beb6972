//! Temporary directive overrides.
//!
//! Some requirements can only be verified by trying them: raise the memory
//! limit, prepend to the include path. [`ScopedOverride`] captures the
//! original value, applies the new one, and puts the original back when it
//! is dropped, whatever happened in between.

use crate::runtime::ConfigSource;

/// Guard that restores a directive when dropped.
pub struct ScopedOverride<'a, C: ConfigSource + ?Sized> {
    source: &'a mut C,
    name: String,
    original: Option<String>,
}

impl<'a, C: ConfigSource + ?Sized> ScopedOverride<'a, C> {
    /// Capture the current value of `name`. Nothing is changed yet.
    pub fn begin(source: &'a mut C, name: &str) -> Self {
        let original = source.get(name);
        Self {
            source,
            name: name.to_string(),
            original,
        }
    }

    /// Value of the directive before this guard was created.
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Request a new value. Returns whether the runtime accepted the request.
    pub fn set(&mut self, value: &str) -> bool {
        match self.source.set(&self.name, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Setting {} = {} failed: {}", self.name, value, e);
                false
            }
        }
    }

    /// Read the directive back.
    pub fn current(&self) -> Option<String> {
        self.source.get(&self.name)
    }
}

impl<C: ConfigSource + ?Sized> Drop for ScopedOverride<'_, C> {
    fn drop(&mut self) {
        self.source.restore(&self.name);
        if let Some(original) = &self.original {
            if self.source.get(&self.name).as_deref() != Some(original.as_str()) {
                if let Err(e) = self.source.set(&self.name, original) {
                    tracing::warn!("Could not restore {} to {}: {}", self.name, original, e);
                }
            }
        }
    }
}

/// What a trial override observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Value before the trial.
    pub original: Option<String>,
    /// Value that was requested.
    pub requested: String,
    /// Value read back while the override was in place.
    pub observed: Option<String>,
}

/// Set `name` to a value derived from its original, read it back, and
/// restore the original.
///
/// `derive` receives the original value and returns the value to try, or
/// `None` to skip the trial (the directive is left untouched and `None`
/// is returned).
pub fn trial_override<C, F>(source: &mut C, name: &str, derive: F) -> Option<Observation>
where
    C: ConfigSource + ?Sized,
    F: FnOnce(Option<&str>) -> Option<String>,
{
    let mut guard = ScopedOverride::begin(source, name);
    let requested = derive(guard.original())?;

    let observed = if guard.set(&requested) {
        guard.current()
    } else {
        None
    };

    Some(Observation {
        original: guard.original().map(String::from),
        requested,
        observed,
    })
}
