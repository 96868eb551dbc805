//! Input structures for a tuning run.
//!
//! `TuningInput` carries the hardware and workload facts the calculator works from.
//! `TuneFileConfig` carries what the orchestrator needs to apply the result to a file.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TuneError, TuneResult};
use crate::types::{EngineVersion, OsFamily, StorageClass, WorkloadClass};

/// Smallest accepted `max_connections` override.
pub const MIN_CONNECTIONS: u32 = 10;
/// Largest accepted CPU count.
pub const MAX_CPUS: u32 = 9999;
/// Largest memory size whose kB value still fits the calculator's arithmetic (`3 * kB`).
pub const MAX_TOTAL_MEMORY_MB: u64 = u64::MAX / (3 << 10);

/// Hardware and workload facts for one calculator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningInput {
  pub engine_version: EngineVersion,
  pub os_family: OsFamily,
  pub workload_class: WorkloadClass,
  /// Total memory on the database host, in megabytes.
  pub total_memory_mb: u64,
  /// Overrides the workload-derived `max_connections` when set.
  pub max_connections: Option<u32>,
  pub storage_class: StorageClass,
  pub cpu_count: u32,
}

impl Default for TuningInput {
  fn default() -> Self {
    TuningInput {
      engine_version: EngineVersion::new([9, 6]),
      os_family: OsFamily::Linux,
      workload_class: WorkloadClass::Mixed,
      total_memory_mb: 0,
      max_connections: None,
      storage_class: StorageClass::Hdd,
      cpu_count: 1,
    }
  }
}

impl TuningInput {
  /// Defaults for everything but the memory size.
  pub fn new(total_memory_mb: u64) -> Self {
    Self {
      total_memory_mb,
      ..Default::default()
    }
  }

  pub fn total_memory_kb(&self) -> u64 {
    self.total_memory_mb.saturating_mul(1 << 10)
  }

  /// Rejects inputs the calculator cannot work with.
  ///
  /// # Errors
  /// `InvalidConnections` for an override below 10, `InvalidCpuCount` outside `1..=9999`,
  /// `InvalidMemory` for zero memory or more than `MAX_TOTAL_MEMORY_MB`.
  pub fn validate(&self) -> TuneResult<()> {
    if let Some(connections) = self.max_connections {
      if connections < MIN_CONNECTIONS {
        return Err(TuneError::InvalidConnections(connections));
      }
    }
    if self.cpu_count == 0 || self.cpu_count > MAX_CPUS {
      return Err(TuneError::InvalidCpuCount(self.cpu_count));
    }
    if self.total_memory_mb == 0 || self.total_memory_mb > MAX_TOTAL_MEMORY_MB {
      return Err(TuneError::InvalidMemory);
    }
    Ok(())
  }
}

/// How the orchestrator treats the target configuration file.
#[derive(Debug, Clone, Default)]
pub struct TuneFileConfig {
  pub path: PathBuf,
  /// Copy the current file aside (timestamped) before replacing it.
  pub backup: bool,
  /// Resolve a symlinked target and replace the file it points to.
  pub follow: bool,
  /// Compute and report, never write.
  pub check_mode: bool,
  /// Capture full before/after text in the report.
  pub diff: bool,
  /// Date stamped into annotation comments; today (local time) when unset.
  pub annotation_date: Option<NaiveDate>,
}

impl TuneFileConfig {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      ..Default::default()
    }
  }
}
