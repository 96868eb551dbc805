//! Applies a tuning to a configuration file on disk.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use log::info;
use serde::Serialize;

use crate::config::{TuneFileConfig, TuningInput};
use crate::error::TuneResult;
use crate::merge::{merge, split_lines};
use crate::tuner::{ParameterSet, ParameterTuner, PgTuner, Tuning, Warning};
use crate::utils::{self, TextEncoding};

/// Full file text before and after the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
  pub before_header: String,
  pub before: String,
  pub after_header: String,
  pub after: String,
}

/// Everything a caller needs to report on one run.
#[derive(Debug, Clone, Serialize)]
pub struct TuneReport {
  pub params: ParameterSet,
  pub warnings: Vec<Warning>,
  pub changed: bool,
  pub msg: String,
  pub updated: Vec<String>,
  pub added: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub backup_file: Option<PathBuf>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub diff: Option<FileDiff>,
}

/// Runs `PgTuner` with default settings against `cfg.path`.
pub fn apply_tuning(cfg: &TuneFileConfig, input: &TuningInput) -> TuneResult<TuneReport> {
  apply_tuning_with(&PgTuner::default(), cfg, input)
}

/// Computes a tuning, merges it into the file at `cfg.path` and writes the result back.
///
/// The file is only replaced when the merge changed something and `cfg.check_mode` is off;
/// a backup is taken first when `cfg.backup` is set.
///
/// # Errors
/// Input-validation errors come first, before the file is looked at. Then `PathIsDirectory`
/// or `PathNotFound` for an unusable target, and `Io` for read, backup or write failures.
/// A file that is not UTF-8 is read and written back as Latin-1, byte for byte.
pub fn apply_tuning_with<T>(tuner: &T, cfg: &TuneFileConfig, input: &TuningInput) -> TuneResult<TuneReport>
where
  T: ParameterTuner + ?Sized,
{
  let Tuning { params, warnings } = tuner.tune(input)?;

  utils::check_target(&cfg.path)?;
  let (before, encoding) = utils::decode_text(fs::read(&cfg.path)?);
  if encoding != TextEncoding::Utf8 {
    info!("[Apply] '{}' is not UTF-8; treating it as Latin-1", cfg.path.display());
  }

  let date = cfg.annotation_date.unwrap_or_else(|| Local::now().date_naive());
  let merged = merge(&split_lines(&before), &params, date);
  let after = merged.content();

  let mut backup_file = None;
  if merged.changed {
    if cfg.check_mode {
      info!("[Apply] Check mode: '{}' would change ({})", cfg.path.display(), merged.message());
    } else {
      if cfg.backup {
        backup_file = Some(utils::backup_file(&cfg.path)?);
      }
      let target = utils::resolve_target(&cfg.path, cfg.follow)?;
      utils::write_atomic(&target, &utils::encode_text(&after, encoding)?)?;
    }
  } else {
    info!("[Apply] '{}' already tuned; nothing to do", cfg.path.display());
  }

  let diff = cfg.diff.then(|| {
    let header = cfg.path.display().to_string();
    FileDiff {
      before_header: header.clone(),
      before,
      after_header: header,
      after,
    }
  });

  Ok(TuneReport {
    msg: merged.message(),
    changed: merged.changed,
    updated: merged.updated_keys,
    added: merged.added_keys,
    params,
    warnings,
    backup_file,
    diff,
  })
}
