//! PostgreSQL configuration tuning: computes recommended parameters from hardware and
//! workload facts and merges them idempotently into an existing `postgresql.conf`.

pub mod apply;
pub mod config;
pub mod error;
pub mod host;
pub mod merge;
pub mod tuner;
pub mod types;
pub mod utils; // Backup/atomic write helpers

// --- Re-exports ---
pub use apply::{apply_tuning, apply_tuning_with, FileDiff, TuneReport};
pub use config::{TuneFileConfig, TuningInput};
pub use error::{TuneError, TuneResult};
pub use host::HostFacts;
pub use merge::{merge, ConfigLine, MergeResult};
pub use tuner::{compute, format_size, ParamValue, ParameterSet, ParameterTuner, PgTuner, Tuning};
pub use types::{EngineVersion, OsFamily, StorageClass, WorkloadClass};
