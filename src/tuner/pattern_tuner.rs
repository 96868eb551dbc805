use serde::Serialize;

use crate::config::TuningInput;
use crate::error::TuneResult;
use crate::tuner::params::ParameterSet;

/// Advisory message produced alongside a successful tuning. Never blocks a run.
pub type Warning = String;

/// Output of one calculator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tuning {
  pub params: ParameterSet,
  pub warnings: Vec<Warning>,
}

/// A strategy mapping hardware and workload facts to configuration parameters.
///
/// Implementors must be deterministic: the same `TuningInput` always yields the same
/// `Tuning`, without side effects beyond logging.
pub trait ParameterTuner {
  /// Computes the recommended parameter set for `input`.
  ///
  /// # Errors
  /// Returns an input-validation `TuneError` when `input` is out of range. No partial
  /// result is produced in that case.
  fn tune(&self, input: &TuningInput) -> TuneResult<Tuning>;
}
