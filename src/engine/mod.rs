//! Section stack and Summary Log
//!
//! The whole engine is two preallocated sequences:
//! - the Active Stack of currently-open sections, in nesting order
//! - the Summary Log of every section ever started, in start order
//!
//! `start` is a push plus an append; `end` is a pop, one clock read, and
//! one child-count increment on the new stack top. Nothing else happens
//! on the hot path. Tree reconstruction and rendering are deferred to
//! [`Profiler::report`].

use tracing::debug;

use crate::clock::Timestamp;
use crate::report::Report;
use crate::section::{Frame, SectionEntry};
use crate::tree;
use crate::ProfilerConfig;

/// Hierarchical section profiler
///
/// Owns the Active Stack and the Summary Log. The log accumulates for the
/// profiler's lifetime; building a report never discards entries, so
/// several reports over one run are cumulative.
///
/// Single-threaded by construction: the caller is the sole mutator and
/// must keep `start`/`end` properly nested. Most code goes through the
/// crate-level free functions, which wrap one `Profiler` per thread.
#[derive(Debug)]
pub struct Profiler {
    /// Currently-open sections, innermost last
    stack: Vec<Frame>,

    /// Every section ever started, in start order (pre-order)
    summary: Vec<SectionEntry>,

    /// Capacities the vectors were preallocated with; exceeding them is
    /// logged once per spill
    config: ProfilerConfig,
}

impl Profiler {
    /// Profiler with default capacities
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    /// Profiler with explicit capacities
    ///
    /// Both sequences are preallocated up front so `start`/`end` never
    /// allocate while the caller stays within the configured capacities.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            stack: Vec::with_capacity(config.stack_capacity),
            summary: Vec::with_capacity(config.summary_capacity),
            config,
        }
    }

    /// Open a section named `name`
    ///
    /// Reserves the next Summary Log slot and pushes a frame binding the
    /// current timestamp to that slot.
    pub fn start(&mut self, name: &'static str) {
        if self.summary.len() == self.config.summary_capacity {
            debug!(
                capacity = self.config.summary_capacity,
                "summary log grew past its preallocated capacity"
            );
        }
        if self.stack.len() == self.config.stack_capacity {
            debug!(
                capacity = self.config.stack_capacity,
                "section stack grew past its preallocated capacity"
            );
        }

        let entry = self.summary.len();
        self.summary.push(SectionEntry::open(name));
        self.stack.push(Frame {
            start: Timestamp::now(),
            entry,
        });
    }

    /// Close the innermost open section
    ///
    /// Finalizes the entry's elapsed time and credits the popped subtree
    /// (its descendants plus itself) to the parent's child count, which
    /// is what keeps subtrees contiguous in the log.
    ///
    /// Closing with nothing open violates the nesting discipline; it
    /// panics in debug builds and does nothing in release builds.
    pub fn end(&mut self) {
        debug_assert!(
            !self.stack.is_empty(),
            "section_end called with no open section"
        );
        let Some(frame) = self.stack.pop() else {
            return;
        };

        self.summary[frame.entry].elapsed_seconds = frame.start.elapsed_seconds();

        if let Some(parent) = self.stack.last() {
            let closed_span = self.summary[frame.entry].child_count + 1;
            self.summary[parent.entry].child_count += closed_span;
        }
    }

    /// Open a root-level phase, closing everything currently open
    ///
    /// Equivalent to `time_subsection(name, 0)`.
    pub fn time_section(&mut self, name: &'static str) {
        self.time_subsection(name, 0);
    }

    /// Open a phase at stack depth `level`, closing deeper sections first
    ///
    /// Sections deeper than `level` are closed innermost-first through
    /// the normal [`Profiler::end`] path, so child-count propagation runs
    /// for each of them. Lets a caller mark a flat run of named phases
    /// without pairing every start with an end.
    pub fn time_subsection(&mut self, name: &'static str, level: usize) {
        while self.stack.len() > level {
            self.end();
        }
        self.start(name);
    }

    /// Close every open section, innermost first
    pub fn close_open_sections(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        debug!(open = self.stack.len(), "closing sections left open");
        while !self.stack.is_empty() {
            self.end();
        }
    }

    /// Number of currently-open sections
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The Summary Log so far, in start order
    #[inline]
    pub fn entries(&self) -> &[SectionEntry] {
        &self.summary
    }

    /// Force-close open sections, reconstruct the forest, and snapshot a
    /// renderable report
    ///
    /// Annotation (indentation and percentage-of-root) happens in place
    /// on the log; the returned [`Report`] copies the annotated entries
    /// so it stays valid while profiling continues.
    pub fn report(&mut self) -> Report {
        self.close_open_sections();
        tree::annotate(&mut self.summary);
        Report::from_entries(&self.summary)
    }
}
