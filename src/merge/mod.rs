//! Line-oriented reconciliation of a parameter set against `postgresql.conf` text.
//!
//! `line` classifies single lines (assignment or opaque); `merger` walks the file, rewrites
//! differing assignments in place under an annotation comment and appends missing keys.

pub mod line;
pub mod merger;

pub use line::{split_lines, ConfigLine};
pub use merger::{merge, MergeResult};

/// Prefix of every annotation comment written by the merger.
pub const ANNOTATION_MARKER: &str = "#pgtune:";
