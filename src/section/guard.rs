//! Scoped auto-close guard
//!
//! Guarantees `section_end()` runs on every exit path of a lexical block:
//! normal return, early return, or unwind.

use std::marker::PhantomData;

/// Closes one section when dropped
///
/// Returned by [`crate::section_guard`]; there is no other way to obtain
/// one. Dropping the guard calls [`crate::section_end`] exactly once.
///
/// The guard is `!Send`: it closes a section on the profiler of the
/// thread that created it.
#[must_use = "dropping this guard ends the section; discarding it immediately closes the section at the call site"]
#[derive(Debug)]
pub struct SectionGuard {
    /// Pins the guard to the creating thread's profiler
    _thread_bound: PhantomData<*const ()>,
}

impl SectionGuard {
    pub(crate) fn new() -> Self {
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for SectionGuard {
    fn drop(&mut self) {
        crate::section_end();
    }
}
