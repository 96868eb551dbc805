//! Computes recommended PostgreSQL parameters from hardware and workload facts.
//!
//! The core components are:
//! - `ParameterTuner`: the strategy trait, returning a `Tuning` (parameters + warnings).
//! - `PgTuner`: the pgtune rule set, gated on engine version, platform and storage.
//! - `ParameterSet` / `ParamValue`: the ordered, formatted result.
//! - `format_size`: kB to `kB`/`MB`/`GB` rendering used for every size parameter.

pub mod calculator;
pub mod params;
pub mod pattern_tuner;
pub mod size;

pub use calculator::{compute, PgTuner};
pub use params::{is_size_formatted, ParamValue, ParameterSet, NEVER_SIZE_FORMATTED};
pub use pattern_tuner::{ParameterTuner, Tuning, Warning};
pub use size::format_size;
