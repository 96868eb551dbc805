use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TuneError {
  #[error("cpus must be a strictly positive integer no greater than 9999 (got {0})")]
  InvalidCpuCount(u32),

  #[error("connections must be an integer greater than or equal to 10 (got {0})")]
  InvalidConnections(u32),

  #[error("total memory must be between 1 and 6004799503160661 MB")]
  InvalidMemory,

  #[error("Invalid engine version '{0}': expected dotted numeric components such as '9.6' or '10'")]
  InvalidVersion(String),

  #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
  UnknownVariant {
    kind: &'static str,
    value: String,
    expected: &'static str,
  },

  #[error("Path {} is a directory!", .0.display())]
  PathIsDirectory(PathBuf),

  #[error("Path {} does not exist!", .0.display())]
  PathNotFound(PathBuf),

  #[error("Underlying IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Operation failed: {0}")]
  Other(String),
}

impl TuneError {
  /// True for conditions rejected before any file is touched.
  pub fn is_invalid_input(&self) -> bool {
    matches!(
      self,
      Self::InvalidCpuCount(_)
        | Self::InvalidConnections(_)
        | Self::InvalidMemory
        | Self::InvalidVersion(_)
        | Self::UnknownVariant { .. }
    )
  }

  /// True when the target path is unusable (directory or missing).
  pub fn is_path_error(&self) -> bool {
    matches!(self, Self::PathIsDirectory(_) | Self::PathNotFound(_))
  }

  /// Process exit status used by the command line front end.
  pub fn exit_code(&self) -> u8 {
    match self {
      e if e.is_invalid_input() => 2,
      Self::PathIsDirectory(_) => 3,
      Self::PathNotFound(_) => 4,
      _ => 1,
    }
  }
}

impl Clone for TuneError {
  fn clone(&self) -> Self {
    match self {
      // io::Error is not Clone; keep its message.
      Self::Io(e) => Self::Other(format!("(Cloned) IO error: {}", e)),

      Self::InvalidCpuCount(n) => Self::InvalidCpuCount(*n),
      Self::InvalidConnections(n) => Self::InvalidConnections(*n),
      Self::InvalidMemory => Self::InvalidMemory,
      Self::InvalidVersion(s) => Self::InvalidVersion(s.clone()),
      Self::UnknownVariant { kind, value, expected } => Self::UnknownVariant {
        kind: *kind,
        value: value.clone(),
        expected: *expected,
      },
      Self::PathIsDirectory(p) => Self::PathIsDirectory(p.clone()),
      Self::PathNotFound(p) => Self::PathNotFound(p.clone()),
      Self::Other(s) => Self::Other(s.clone()),
    }
  }
}

// Helper type alias
pub type TuneResult<T> = Result<T, TuneError>;
