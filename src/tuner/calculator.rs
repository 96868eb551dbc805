use crate::config::TuningInput;
use crate::error::TuneResult;
use crate::tuner::params::{is_size_formatted, ParamValue, ParameterSet};
use crate::tuner::pattern_tuner::{ParameterTuner, Tuning, Warning};
use crate::tuner::size::format_size;
use crate::types::{OsFamily, StorageClass, WorkloadClass};

const LOW_MEMORY_MB: u64 = 256;
const HIGH_MEMORY_MB: u64 = 100 << 10;

const WINDOWS_SHARED_BUFFERS_CAP_KB: u64 = 512 << 10;
const MAINTENANCE_WORK_MEM_CAP_KB: u64 = 2 << 20;
const MIN_WORK_MEM_KB: u64 = 64;
const WAL_BUFFERS_CAP_KB: u64 = 16 << 10;
const WAL_BUFFERS_ROUND_UP_FLOOR_KB: u64 = 14 << 10;

/// Per-workload constants.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WorkloadDefaults {
  max_connections: u32,
  /// Used before 9.5.
  checkpoint_segments: u64,
  /// `(min_wal_size, max_wal_size)` in MB, from 9.5 on.
  wal_size_mb: (u64, u64),
  checkpoint_completion_target: f64,
  /// Divisor for the workload-adjusted `work_mem`.
  work_mem_divisor: f64,
}

const DESKTOP: WorkloadDefaults = WorkloadDefaults {
  max_connections: 10,
  checkpoint_segments: 3,
  wal_size_mb: (100, 1024),
  checkpoint_completion_target: 0.5,
  work_mem_divisor: 6.0,
};

const DW: WorkloadDefaults = WorkloadDefaults {
  max_connections: 20,
  checkpoint_segments: 128,
  wal_size_mb: (4096, 8192),
  checkpoint_completion_target: 0.9,
  work_mem_divisor: 2.0,
};

const MIXED: WorkloadDefaults = WorkloadDefaults {
  max_connections: 100,
  checkpoint_segments: 32,
  wal_size_mb: (1024, 2048),
  checkpoint_completion_target: 0.9,
  work_mem_divisor: 2.0,
};

const OLTP: WorkloadDefaults = WorkloadDefaults {
  max_connections: 300,
  checkpoint_segments: 64,
  wal_size_mb: (2048, 4096),
  checkpoint_completion_target: 0.9,
  work_mem_divisor: 1.0,
};

const WEB: WorkloadDefaults = WorkloadDefaults {
  max_connections: 200,
  checkpoint_segments: 32,
  wal_size_mb: (1024, 2048),
  checkpoint_completion_target: 0.7,
  work_mem_divisor: 1.0,
};

impl WorkloadDefaults {
  fn for_class(class: WorkloadClass) -> &'static WorkloadDefaults {
    match class {
      WorkloadClass::Desktop => &DESKTOP,
      WorkloadClass::Dw => &DW,
      WorkloadClass::Mixed => &MIXED,
      WorkloadClass::Oltp => &OLTP,
      WorkloadClass::Web => &WEB,
    }
  }
}

/// Unformatted calculator output; sizes are in kB.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawValue {
  Int(u64),
  Ratio(f64),
}

/// PostgreSQL parameter calculator following the pgtune rules.
#[derive(Debug, Clone, Default)]
pub struct PgTuner {
  /// Store `work_mem` divided by the workload divisor (6 for desktop, 2 for dw/mixed).
  ///
  /// Off by default: the established behaviour computes the adjusted value but keeps the
  /// unadjusted one.
  pub adjust_work_mem_for_workload: bool,
}

impl PgTuner {
  pub fn new() -> Self {
    Self::default()
  }

  fn work_mem_kb(
    &self,
    input: &TuningInput,
    total_kb: u64,
    shared_buffers_kb: u64,
    max_connections: u64,
    max_parallel_workers_per_gather: u64,
  ) -> u64 {
    let base = (total_kb - shared_buffers_kb) as f64
      / (3.0 * max_connections as f64)
      / max_parallel_workers_per_gather as f64;
    let adjusted = base / WorkloadDefaults::for_class(input.workload_class).work_mem_divisor;
    log::debug!(
      "[Tuner] work_mem base {:.2} kB, workload-adjusted {:.2} kB (adjustment applied: {})",
      base,
      adjusted,
      self.adjust_work_mem_for_workload
    );

    let chosen = if self.adjust_work_mem_for_workload { adjusted } else { base };
    (chosen.floor() as u64).max(MIN_WORK_MEM_KB)
  }
}

/// Computes the parameter set with the default `PgTuner`.
pub fn compute(input: &TuningInput) -> TuneResult<Tuning> {
  PgTuner::default().tune(input)
}

impl ParameterTuner for PgTuner {
  fn tune(&self, input: &TuningInput) -> TuneResult<Tuning> {
    input.validate()?;
    log::debug!("[Tuner] Computing parameters for {:?}", input);

    let workload = input.workload_class;
    let defaults = WorkloadDefaults::for_class(workload);
    let total_kb = input.total_memory_kb();
    let cpus = u64::from(input.cpu_count);
    let mut raw: Vec<(&'static str, RawValue)> = Vec::new();
    let mut warnings: Vec<Warning> = Vec::new();

    let max_connections = u64::from(input.max_connections.unwrap_or(defaults.max_connections));
    raw.push(("max_connections", RawValue::Int(max_connections)));

    if input.total_memory_mb < LOW_MEMORY_MB {
      warnings.push("Not optimal for low memory systems".to_string());
    }
    if input.total_memory_mb > HIGH_MEMORY_MB {
      warnings.push("Not optimal for very high memory systems".to_string());
    }
    for warning in &warnings {
      log::warn!("[Tuner] {} ({} MB)", warning, input.total_memory_mb);
    }

    let mut shared_buffers = match workload {
      WorkloadClass::Desktop => total_kb / 16,
      _ => total_kb / 4,
    };
    if input.os_family == OsFamily::Windows && shared_buffers > WINDOWS_SHARED_BUFFERS_CAP_KB {
      log::debug!("[Tuner] Capping shared_buffers at 512MB on Windows (computed {} kB)", shared_buffers);
      shared_buffers = WINDOWS_SHARED_BUFFERS_CAP_KB;
    }
    raw.push(("shared_buffers", RawValue::Int(shared_buffers)));

    let effective_cache_size = match workload {
      WorkloadClass::Desktop => total_kb / 4,
      _ => 3 * total_kb / 4,
    };
    raw.push(("effective_cache_size", RawValue::Int(effective_cache_size)));

    // ceil(0.5 * cpus); always needed by work_mem even when not emitted.
    let max_parallel_workers_per_gather = (cpus + 1) / 2;
    let work_mem = self.work_mem_kb(
      input,
      total_kb,
      shared_buffers,
      max_connections,
      max_parallel_workers_per_gather,
    );
    raw.push(("work_mem", RawValue::Int(work_mem)));

    let maintenance_work_mem = match workload {
      WorkloadClass::Dw => total_kb / 8,
      _ => total_kb / 16,
    };
    raw.push((
      "maintenance_work_mem",
      RawValue::Int(maintenance_work_mem.min(MAINTENANCE_WORK_MEM_CAP_KB)),
    ));

    if !input.engine_version.at_least(&[9, 5]) {
      raw.push(("checkpoint_segments", RawValue::Int(defaults.checkpoint_segments)));
    } else {
      let (min_wal_mb, max_wal_mb) = defaults.wal_size_mb;
      raw.push(("min_wal_size", RawValue::Int(min_wal_mb << 10)));
      raw.push(("max_wal_size", RawValue::Int(max_wal_mb << 10)));
    }

    raw.push((
      "checkpoint_completion_target",
      RawValue::Ratio(defaults.checkpoint_completion_target),
    ));

    // 3% of shared_buffers up to 16MB; values just under 16MB are rounded up to it.
    let mut wal_buffers = (3 * shared_buffers / 100).min(WAL_BUFFERS_CAP_KB);
    if wal_buffers > WAL_BUFFERS_ROUND_UP_FLOOR_KB && wal_buffers < WAL_BUFFERS_CAP_KB {
      wal_buffers = WAL_BUFFERS_CAP_KB;
    }
    raw.push(("wal_buffers", RawValue::Int(wal_buffers)));

    let default_statistics_target = match workload {
      WorkloadClass::Dw => 500,
      _ => 100,
    };
    raw.push(("default_statistics_target", RawValue::Int(default_statistics_target)));

    let random_page_cost = match input.storage_class {
      StorageClass::Hdd => RawValue::Int(4),
      StorageClass::Ssd | StorageClass::San => RawValue::Ratio(1.1),
    };
    raw.push(("random_page_cost", random_page_cost));

    if input.os_family != OsFamily::Windows {
      let effective_io_concurrency = match input.storage_class {
        StorageClass::Hdd => 2,
        StorageClass::Ssd => 200,
        StorageClass::San => 300,
      };
      raw.push(("effective_io_concurrency", RawValue::Int(effective_io_concurrency)));
    }

    let version = &input.engine_version;
    if version.at_least(&[9, 5]) && cpus > 1 {
      raw.push(("max_worker_processes", RawValue::Int(cpus)));
      if version.at_least(&[9, 6]) {
        raw.push((
          "max_parallel_workers_per_gather",
          RawValue::Int(max_parallel_workers_per_gather),
        ));
        if version.at_least(&[10]) {
          raw.push(("max_parallel_workers", RawValue::Int(cpus)));
        }
      }
    }

    let params: ParameterSet = raw.into_iter().map(|(key, value)| (key, finalize(key, value))).collect();
    log::debug!("[Tuner] Computed {} parameters", params.len());

    Ok(Tuning { params, warnings })
  }
}

fn finalize(key: &str, value: RawValue) -> ParamValue {
  match (is_size_formatted(key), value) {
    (true, RawValue::Int(kb)) => ParamValue::Size(format_size(kb)),
    (false, RawValue::Int(n)) => ParamValue::Integer(n),
    // ratios are never sizes
    (_, RawValue::Ratio(r)) => ParamValue::Ratio(r),
  }
}
