//! Hardware facts of the machine the tool runs on.

use sysinfo::System;

use crate::config::{TuningInput, MAX_CPUS};

/// Total memory and logical CPU count of the local host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFacts {
  pub total_memory_mb: u64,
  pub cpu_count: u32,
}

impl HostFacts {
  /// Reads total memory through sysinfo and the logical CPU count, clamped to `1..=9999`.
  pub fn detect() -> Self {
    let mut sys = System::new();
    sys.refresh_memory();
    // sysinfo reports bytes
    let total_memory_mb = sys.total_memory() >> 20;
    let cpu_count = u32::try_from(num_cpus::get()).unwrap_or(MAX_CPUS).clamp(1, MAX_CPUS);
    log::debug!(
      "[Host] Detected {} MB memory, {} logical CPUs",
      total_memory_mb,
      cpu_count
    );
    HostFacts {
      total_memory_mb,
      cpu_count,
    }
  }

  /// Fills memory and CPU count of `input` with the detected values.
  pub fn apply_to(&self, input: &mut TuningInput) {
    input.total_memory_mb = self.total_memory_mb;
    input.cpu_count = self.cpu_count;
  }
}
