//! # Hierarchical Wall-Clock Section Profiler
//!
//! Callers mark the start and end of named sections of code, possibly
//! nested; the engine reconstructs the call forest, computes each
//! section's duration and its share of its tree root's time, and renders
//! an aligned, indented text table.
//!
//! ## Core Design
//!
//! 1. **Active Stack**: the currently-open sections, in nesting order
//! 2. **Summary Log**: every section ever started, flat, in start order
//!    (a pre-order encoding of the call forest)
//! 3. **Child-count encoding**: each entry stores how many following log
//!    entries belong to its subtree, so the forest is reconstructed with
//!    no parent/child pointers at all
//! 4. **Deferred rendering**: `start`/`end` are a push/pop plus one clock
//!    read; all tree work happens when a report is requested
//!
//! ## Usage
//!
//! ```
//! use chronotree::{print_summary, section_end, section_guard, section_start};
//!
//! section_start("load");
//! {
//!     let _guard = section_guard("parse");
//! }
//! section_end();
//! print_summary();
//! ```
//!
//! Flat phase sequences need no manual pairing:
//!
//! ```
//! use chronotree::{print_summary, time_section, time_subsection};
//!
//! time_section("setup");
//! time_section("run");
//! time_subsection("run: warmup", 1);
//! time_subsection("run: measure", 1);
//! time_section("teardown");
//! print_summary(); // force-closes whatever is still open
//! ```
//!
//! ## Disabling
//!
//! Enabling the `disable` cargo feature compiles every global operation
//! down to a no-op with an identical signature, so instrumented call
//! sites build unchanged while the optimizer removes the profiler
//! entirely.
//!
//! ## Threading
//!
//! The global profiler is thread-local: each thread records its own
//! forest and `print_summary` reports the calling thread's sections.
//! There is no cross-thread aggregation.

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules - each implements one layer of the engine
pub mod clock;    // Monotonic timestamp primitive
pub mod engine;   // Active Stack + Summary Log (start/end)
pub mod report;   // Rendered summary table
pub mod section;  // Entry/frame records and the scoped guard
pub mod tree;     // Implicit forest reconstruction

// Re-exports for convenience
pub use clock::Timestamp;
pub use engine::Profiler;
pub use report::Report;
pub use section::{SectionEntry, SectionGuard};

use std::cell::RefCell;
use std::env;
use std::num::ParseIntError;

use thiserror::Error;
use tracing::warn;

/// Default Active Stack preallocation (open sections)
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Default Summary Log preallocation (recorded sections)
pub const DEFAULT_SUMMARY_CAPACITY: usize = 1024;

/// Environment override for [`ProfilerConfig::stack_capacity`]
pub const ENV_STACK_CAPACITY: &str = "CHRONOTREE_STACK_CAPACITY";

/// Environment override for [`ProfilerConfig::summary_capacity`]
pub const ENV_SUMMARY_CAPACITY: &str = "CHRONOTREE_SUMMARY_CAPACITY";

/// Compile-time switch selected by the `disable` cargo feature
const DISABLED: bool = cfg!(feature = "disable");

/// Capacity configuration for a [`Profiler`]
///
/// Capacities size the preallocations; they are not hard limits. A run
/// that exceeds one costs a reallocation (reported at debug level), not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerConfig {
    /// Open sections the Active Stack holds without reallocating
    pub stack_capacity: usize,

    /// Recorded sections the Summary Log holds without reallocating
    pub summary_capacity: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            summary_capacity: DEFAULT_SUMMARY_CAPACITY,
        }
    }
}

impl ProfilerConfig {
    /// Defaults overridden by `CHRONOTREE_STACK_CAPACITY` and
    /// `CHRONOTREE_SUMMARY_CAPACITY`, when set
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(capacity) = read_capacity(ENV_STACK_CAPACITY)? {
            config.stack_capacity = capacity;
        }
        if let Some(capacity) = read_capacity(ENV_SUMMARY_CAPACITY)? {
            config.summary_capacity = capacity;
        }
        Ok(config)
    }

    /// Like [`ProfilerConfig::from_env`], but a malformed value logs a
    /// warning and falls back to the default instead of failing
    ///
    /// Used to build the thread-local profiler, which has no caller to
    /// surface an error to.
    pub fn from_env_lossy() -> Self {
        Self::from_env().unwrap_or_else(|error| {
            warn!(%error, "ignoring malformed profiler configuration");
            Self::default()
        })
    }
}

fn read_capacity(var: &'static str) -> Result<Option<usize>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|source| ConfigError::InvalidCapacity { var, value, source }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
    }
}

/// Errors from reading profiler configuration out of the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A capacity variable was set to something other than an integer
    #[error("invalid value '{value}' for {var}: {source}")]
    InvalidCapacity {
        /// Offending environment variable
        var: &'static str,
        /// Value it was set to
        value: String,
        /// Parse failure
        source: ParseIntError,
    },

    /// A capacity variable was set to non-unicode bytes
    #[error("value of {var} is not valid unicode")]
    NotUnicode {
        /// Offending environment variable
        var: &'static str,
    },
}

thread_local! {
    static PROFILER: RefCell<Profiler> =
        RefCell::new(Profiler::with_config(ProfilerConfig::from_env_lossy()));
}

/// Open a section named `name` on this thread's profiler
///
/// Must be balanced by a later [`section_end`] (or left to
/// [`print_summary`]'s force-close).
pub fn section_start(name: &'static str) {
    if DISABLED {
        return;
    }
    PROFILER.with(|p| p.borrow_mut().start(name));
}

/// Close the innermost open section on this thread's profiler
pub fn section_end() {
    if DISABLED {
        return;
    }
    PROFILER.with(|p| p.borrow_mut().end());
}

/// Open a section that closes itself when the returned guard drops
///
/// The guard must be bound to a name (`let _guard = ...`); discarding it
/// immediately closes the section at the call site, which the compiler
/// flags through `#[must_use]`.
#[must_use = "destruction of the return value is treated as the end of the section"]
pub fn section_guard(name: &'static str) -> SectionGuard {
    section_start(name);
    SectionGuard::new()
}

/// Open a root-level phase, closing every section currently open
///
/// Equivalent to [`time_subsection`] with level 0.
pub fn time_section(name: &'static str) {
    if DISABLED {
        return;
    }
    PROFILER.with(|p| p.borrow_mut().time_section(name));
}

/// Open a phase at stack depth `level`, closing deeper sections first
///
/// Sections are closed innermost-first through the normal end path. A
/// `level` of 1 marks successive phases inside one enclosing section,
/// and is the conventional choice for callers that opened that enclosing
/// section with [`time_section`].
pub fn time_subsection(name: &'static str, level: usize) {
    if DISABLED {
        return;
    }
    PROFILER.with(|p| p.borrow_mut().time_subsection(name, level));
}

/// Force-close open sections and print this thread's summary table to
/// standard output
pub fn print_summary() {
    if DISABLED {
        return;
    }
    let report = PROFILER.with(|p| p.borrow_mut().report());
    print!("{report}");
}

/// Run `f` against this thread's profiler
///
/// Inspection and embedding hook; the free functions above cover normal
/// instrumentation. Calling any of them from inside `f` panics (the
/// profiler is already borrowed).
pub fn with_profiler<R>(f: impl FnOnce(&mut Profiler) -> R) -> R {
    PROFILER.with(|p| f(&mut p.borrow_mut()))
}
