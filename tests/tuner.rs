mod common;

use common::setup_logging;

use pgtuner::tuner::{compute, ParamValue, ParameterTuner, PgTuner};
use pgtuner::config::MAX_TOTAL_MEMORY_MB;
use pgtuner::{OsFamily, StorageClass, TuneError, TuningInput, WorkloadClass};

fn input(total_memory_mb: u64, workload_class: WorkloadClass, version: &str, cpu_count: u32) -> TuningInput {
  TuningInput {
    engine_version: version.parse().unwrap(),
    workload_class,
    cpu_count,
    ..TuningInput::new(total_memory_mb)
  }
}

fn size(s: &str) -> ParamValue {
  ParamValue::Size(s.to_string())
}

#[test]
fn web_server_on_9_2_matches_reference_values() {
  setup_logging();
  let tuning = compute(&input(8192, WorkloadClass::Web, "9.2", 1)).unwrap();
  let p = &tuning.params;

  assert_eq!(p.get("max_connections"), Some(&ParamValue::Integer(200)));
  // 8192MB / 4 = 2048MB, rendered in the largest exact unit
  assert_eq!(p.get("shared_buffers"), Some(&size("2GB")));
  assert_eq!(p.get("effective_cache_size"), Some(&size("6GB")));
  assert_eq!(p.get("work_mem"), Some(&size("10485kB")));
  assert_eq!(p.get("maintenance_work_mem"), Some(&size("512MB")));
  assert_eq!(p.get("checkpoint_segments"), Some(&ParamValue::Integer(32)));
  assert!(!p.contains_key("min_wal_size"));
  assert!(!p.contains_key("max_wal_size"));
  assert_eq!(p.get("checkpoint_completion_target"), Some(&ParamValue::Ratio(0.7)));
  assert_eq!(p.get("wal_buffers"), Some(&size("16MB")));
  assert_eq!(p.get("default_statistics_target"), Some(&ParamValue::Integer(100)));
  assert_eq!(p.get("random_page_cost"), Some(&ParamValue::Integer(4)));
  assert_eq!(p.get("effective_io_concurrency"), Some(&ParamValue::Integer(2)));
  assert!(!p.contains_key("max_worker_processes"));
  assert!(tuning.warnings.is_empty());

  let keys: Vec<&str> = p.keys().collect();
  assert_eq!(
    keys,
    vec![
      "max_connections",
      "shared_buffers",
      "effective_cache_size",
      "work_mem",
      "maintenance_work_mem",
      "checkpoint_segments",
      "checkpoint_completion_target",
      "wal_buffers",
      "default_statistics_target",
      "random_page_cost",
      "effective_io_concurrency",
    ]
  );
}

#[test]
fn data_warehouse_on_10_with_ssd() {
  setup_logging();
  let mut dw = input(65536, WorkloadClass::Dw, "10", 8);
  dw.storage_class = StorageClass::Ssd;
  let p = compute(&dw).unwrap().params;

  assert_eq!(p.get("max_connections").unwrap().to_string(), "20");
  assert_eq!(p.get("shared_buffers").unwrap().to_string(), "16GB");
  assert_eq!(p.get("effective_cache_size").unwrap().to_string(), "48GB");
  assert_eq!(p.get("work_mem").unwrap().to_string(), "209715kB");
  // capped at 2GB
  assert_eq!(p.get("maintenance_work_mem").unwrap().to_string(), "2GB");
  assert_eq!(p.get("min_wal_size").unwrap().to_string(), "4GB");
  assert_eq!(p.get("max_wal_size").unwrap().to_string(), "8GB");
  assert!(!p.contains_key("checkpoint_segments"));
  assert_eq!(p.get("checkpoint_completion_target").unwrap().to_string(), "0.9");
  assert_eq!(p.get("default_statistics_target").unwrap().to_string(), "500");
  assert_eq!(p.get("random_page_cost").unwrap().to_string(), "1.1");
  assert_eq!(p.get("effective_io_concurrency").unwrap().to_string(), "200");
  assert_eq!(p.get("max_worker_processes").unwrap().to_string(), "8");
  assert_eq!(p.get("max_parallel_workers_per_gather").unwrap().to_string(), "4");
  assert_eq!(p.get("max_parallel_workers").unwrap().to_string(), "8");
}

#[test]
fn parallelism_is_gated_by_version_tier() {
  setup_logging();
  let p95 = compute(&input(8192, WorkloadClass::Mixed, "9.5", 4)).unwrap().params;
  assert_eq!(p95.get("max_worker_processes"), Some(&ParamValue::Integer(4)));
  assert!(!p95.contains_key("max_parallel_workers_per_gather"));
  assert!(!p95.contains_key("max_parallel_workers"));
  assert_eq!(p95.get("min_wal_size").unwrap().to_string(), "1GB");
  assert_eq!(p95.get("max_wal_size").unwrap().to_string(), "2GB");

  let p96 = compute(&input(8192, WorkloadClass::Mixed, "9.6", 4)).unwrap().params;
  assert_eq!(p96.get("max_worker_processes"), Some(&ParamValue::Integer(4)));
  assert_eq!(p96.get("max_parallel_workers_per_gather"), Some(&ParamValue::Integer(2)));
  assert!(!p96.contains_key("max_parallel_workers"));

  let p10 = compute(&input(8192, WorkloadClass::Mixed, "10", 4)).unwrap().params;
  assert_eq!(p10.get("max_worker_processes"), Some(&ParamValue::Integer(4)));
  assert_eq!(p10.get("max_parallel_workers_per_gather"), Some(&ParamValue::Integer(2)));
  assert_eq!(p10.get("max_parallel_workers"), Some(&ParamValue::Integer(4)));

  // A single CPU never enables the parallel settings.
  let single = compute(&input(8192, WorkloadClass::Mixed, "10", 1)).unwrap().params;
  assert!(!single.contains_key("max_worker_processes"));
  assert!(!single.contains_key("max_parallel_workers_per_gather"));
}

#[test]
fn windows_caps_shared_buffers_and_drops_io_concurrency() {
  setup_logging();
  let mut win = input(65536, WorkloadClass::Mixed, "9.6", 1);
  win.os_family = OsFamily::Windows;
  let p = compute(&win).unwrap().params;

  assert_eq!(p.get("shared_buffers").unwrap().to_string(), "512MB");
  assert!(!p.contains_key("effective_io_concurrency"));
  // 3% of 512MB is 15728kB, rounded up to 16MB
  assert_eq!(p.get("wal_buffers").unwrap().to_string(), "16MB");
  assert_eq!(p.get("work_mem").unwrap().to_string(), "221948kB");
}

#[test]
fn desktop_work_mem_keeps_unadjusted_value_unless_enabled() {
  setup_logging();
  let desktop = input(4096, WorkloadClass::Desktop, "9.6", 1);

  let p = compute(&desktop).unwrap().params;
  assert_eq!(p.get("shared_buffers").unwrap().to_string(), "256MB");
  assert_eq!(p.get("effective_cache_size").unwrap().to_string(), "1GB");
  assert_eq!(p.get("work_mem").unwrap().to_string(), "128MB");
  assert_eq!(p.get("min_wal_size").unwrap().to_string(), "100MB");
  assert_eq!(p.get("max_wal_size").unwrap().to_string(), "1GB");
  assert_eq!(p.get("checkpoint_completion_target").unwrap().to_string(), "0.5");
  assert_eq!(p.get("wal_buffers").unwrap().to_string(), "7864kB");

  let adjusting = PgTuner {
    adjust_work_mem_for_workload: true,
  };
  let adjusted = adjusting.tune(&desktop).unwrap().params;
  assert_eq!(adjusted.get("work_mem").unwrap().to_string(), "21845kB");
}

#[test]
fn work_mem_never_drops_below_64kb() {
  setup_logging();
  let mut tiny = input(128, WorkloadClass::Oltp, "9.6", 1);
  tiny.max_connections = Some(1000);
  let tuning = compute(&tiny).unwrap();

  assert_eq!(tuning.params.get("max_connections"), Some(&ParamValue::Integer(1000)));
  assert_eq!(tuning.params.get("work_mem").unwrap().to_string(), "64kB");
  assert_eq!(tuning.warnings, vec!["Not optimal for low memory systems".to_string()]);
}

#[test]
fn very_high_memory_only_warns() {
  setup_logging();
  let big = input((100 << 10) + 1, WorkloadClass::Mixed, "9.6", 1);
  let tuning = compute(&big).unwrap();
  assert_eq!(tuning.warnings, vec!["Not optimal for very high memory systems".to_string()]);
  assert!(tuning.params.contains_key("shared_buffers"));

  let at_limit = compute(&input(100 << 10, WorkloadClass::Mixed, "9.6", 1)).unwrap();
  assert!(at_limit.warnings.is_empty());
}

#[test]
fn invalid_inputs_are_rejected() {
  setup_logging();
  let mut few_connections = input(8192, WorkloadClass::Web, "9.6", 1);
  few_connections.max_connections = Some(9);
  assert!(matches!(
    compute(&few_connections),
    Err(TuneError::InvalidConnections(9))
  ));
  few_connections.max_connections = Some(10);
  assert!(compute(&few_connections).is_ok());

  for cpus in [0, 10_000] {
    let err = compute(&input(8192, WorkloadClass::Web, "9.6", cpus)).unwrap_err();
    assert!(matches!(err, TuneError::InvalidCpuCount(n) if n == cpus));
    assert!(err.is_invalid_input());
    assert_eq!(err.exit_code(), 2);
  }
  assert!(compute(&input(8192, WorkloadClass::Web, "9.6", 9999)).is_ok());

  assert!(matches!(
    compute(&input(0, WorkloadClass::Web, "9.6", 1)),
    Err(TuneError::InvalidMemory)
  ));
}

#[test]
fn memory_too_large_for_kilobyte_arithmetic_is_rejected() {
  setup_logging();
  for mb in [MAX_TOTAL_MEMORY_MB + 1, 1 << 53, u64::MAX] {
    let err = compute(&TuningInput::new(mb)).unwrap_err();
    assert!(matches!(err, TuneError::InvalidMemory));
    assert_eq!(err.exit_code(), 2);
  }

  let largest = compute(&input(MAX_TOTAL_MEMORY_MB, WorkloadClass::Dw, "10", 8)).unwrap();
  assert_eq!(
    largest.warnings,
    vec!["Not optimal for very high memory systems".to_string()]
  );
  assert_eq!(largest.params.get("maintenance_work_mem").unwrap().to_string(), "2GB");
}

#[test]
fn san_storage_settings() {
  setup_logging();
  let mut san = input(8192, WorkloadClass::Oltp, "9.6", 2);
  san.storage_class = StorageClass::San;
  let p = compute(&san).unwrap().params;

  assert_eq!(p.get("random_page_cost"), Some(&ParamValue::Ratio(1.1)));
  assert_eq!(p.get("effective_io_concurrency"), Some(&ParamValue::Integer(300)));
}

#[test]
fn compute_is_deterministic() {
  setup_logging();
  let oltp = input(16384, WorkloadClass::Oltp, "11.4", 6);
  assert_eq!(compute(&oltp).unwrap(), compute(&oltp).unwrap());
}
