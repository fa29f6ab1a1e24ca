//! Monotonic timestamp primitive
//!
//! Single access point for wall-clock reads. Everything downstream works
//! in fractional seconds (`f64`), so the conversion from the platform
//! clock happens exactly once, when a section closes.

use std::time::Instant;

/// A point in time captured from the monotonic high-resolution clock
#[derive(Debug, Clone, Copy)]
pub struct Timestamp(Instant);

impl Timestamp {
    /// Capture the current instant
    #[inline]
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Fractional seconds elapsed since this timestamp was captured
    ///
    /// Monotonic: never negative, unaffected by wall-clock adjustments.
    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}
