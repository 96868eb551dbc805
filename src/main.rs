//! `pgtuner` - tune a postgresql.conf for the given hardware and workload.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use env_logger::Env;

use pgtuner::{
  apply_tuning, EngineVersion, HostFacts, OsFamily, StorageClass, TuneError, TuneFileConfig, TuneReport,
  TuningInput, WorkloadClass,
};

#[derive(Parser)]
#[command(name = "pgtuner")]
#[command(about = "Tune PostgreSQL configuration by hardware", long_about = None)]
struct Cli {
  /// Path to the postgresql.conf to modify
  #[arg(long, visible_aliases = ["dest", "destfile", "name"])]
  path: PathBuf,

  /// PostgreSQL version
  #[arg(long, default_value = "9.6")]
  db_version: EngineVersion,

  /// Operating system where PostgreSQL runs (linux, windows)
  #[arg(long, default_value = "linux")]
  os_type: OsFamily,

  /// Database usage type (desktop, dw, mixed, oltp, web)
  #[arg(long, default_value = "mixed")]
  db_type: WorkloadClass,

  /// Total memory on the server, in megabytes
  #[arg(long)]
  total_memory: Option<u64>,

  /// Maximum number of client connections (at least 10); derived from --db-type when omitted
  #[arg(long)]
  connections: Option<u32>,

  /// Storage type of the data directory (hdd, ssd, san)
  #[arg(long, default_value = "hdd")]
  harddrive_type: StorageClass,

  /// Number of CPUs PostgreSQL can use
  #[arg(long)]
  cpus: Option<u32>,

  /// Fill --total-memory and --cpus from this host when they are omitted
  #[arg(long)]
  detect: bool,

  /// Keep a timestamped copy of the file before changing it
  #[arg(long)]
  backup: bool,

  /// Replace the target of a symlinked path instead of the link
  #[arg(long)]
  follow: bool,

  /// Report what would change without writing
  #[arg(long)]
  check: bool,

  /// Include full before/after content in the report
  #[arg(long)]
  diff: bool,

  /// Print the report as JSON
  #[arg(long)]
  json: bool,

  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,
}

impl Cli {
  fn tuning_input(&self) -> Result<TuningInput, TuneError> {
    if self.total_memory.is_none() && !self.detect {
      return Err(TuneError::Other(
        "--total-memory is required unless --detect is given".to_string(),
      ));
    }

    let mut input = TuningInput {
      engine_version: self.db_version.clone(),
      os_family: self.os_type,
      workload_class: self.db_type,
      max_connections: self.connections,
      storage_class: self.harddrive_type,
      ..TuningInput::default()
    };
    if self.detect {
      HostFacts::detect().apply_to(&mut input);
    }
    // explicit values win over detected ones
    if let Some(mb) = self.total_memory {
      input.total_memory_mb = mb;
    }
    if let Some(cpus) = self.cpus {
      input.cpu_count = cpus;
    }
    Ok(input)
  }

  fn file_config(&self) -> TuneFileConfig {
    TuneFileConfig {
      path: self.path.clone(),
      backup: self.backup,
      follow: self.follow,
      check_mode: self.check,
      diff: self.diff,
      annotation_date: None,
    }
  }
}

fn print_report(report: &TuneReport) {
  println!("Computed parameters:");
  for (key, value) in report.params.iter() {
    println!("  {:<34} {}", key, value);
  }
  for warning in &report.warnings {
    println!("Warning: {}", warning);
  }
  if report.changed {
    println!("Changed: {}", report.msg);
  } else {
    println!("Unchanged: configuration already tuned");
  }
  if let Some(backup) = &report.backup_file {
    println!("Backup:  {}", backup.display());
  }
  if let Some(diff) = &report.diff {
    println!("--- {}", diff.before_header);
    print!("{}", diff.before);
    println!("+++ {}", diff.after_header);
    print!("{}", diff.after);
  }
}

fn run(cli: &Cli) -> Result<(), TuneError> {
  let input = cli.tuning_input()?;
  let report = apply_tuning(&cli.file_config(), &input)?;

  if cli.json {
    let json = serde_json::to_string_pretty(&report).map_err(|e| TuneError::Other(e.to_string()))?;
    println!("{}", json);
  } else {
    print_report(&report);
  }
  Ok(())
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let level = match cli.verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

  match run(&cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("pgtuner: {}", e);
      ExitCode::from(e.exit_code())
    }
  }
}
