//! Rendered summary table
//!
//! One line per Summary Log entry, in log order:
//!
//! ```text
//! load............0.75012340s 100.0000% (2)
//!   parse.........0.50003210s  66.6601%
//!   typecheck.....0.25001200s  33.3322%
//! ```
//!
//! Names are indented by nesting depth and padded with `.` so the
//! duration column starts at the same offset on every line, whatever the
//! name lengths are. The child-count suffix appears only for entries that
//! have descendants.

use std::fmt;
use std::io;

use crate::section::SectionEntry;

/// Dots between the longest name and the duration column
const LABEL_MARGIN: usize = 4;

/// Snapshot of an annotated Summary Log, ready to print
///
/// Produced by [`crate::engine::Profiler::report`]. Owns copies of the
/// entries, so it remains valid while profiling continues.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Report {
    entries: Vec<SectionEntry>,
    /// Width of the widest name plus its indentation
    label_width: usize,
}

impl Report {
    /// Snapshot `entries`; expects the annotation pass to have run
    pub(crate) fn from_entries(entries: &[SectionEntry]) -> Self {
        let label_width = entries
            .iter()
            .map(|e| e.name.len() + e.indentation as usize)
            .max()
            .unwrap_or(0);
        Self {
            entries: entries.to_vec(),
            label_width,
        }
    }

    /// Annotated entries, in Summary Log order
    #[inline]
    pub fn entries(&self) -> &[SectionEntry] {
        &self.entries
    }

    /// Number of recorded sections
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the table into any writer
    pub fn write_into<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let indent = entry.indentation as usize;
            let filler = self.label_width - entry.name.len() - indent + LABEL_MARGIN;

            write!(f, "{:indent$}{}", "", entry.name)?;
            write!(f, "{:.<filler$}", "")?;
            write!(f, "{:.8}s ", entry.elapsed_seconds)?;
            write!(f, "{:>8.4}%", entry.time_percentage)?;
            if entry.child_count > 0 {
                write!(f, " ({})", entry.child_count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
