use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TuneError, TuneResult};

/// Generates a lowercase-named enum with `as_str`, `Display` and `FromStr`.
macro_rules! named_enum {
  (
    $(#[$outer:meta])*
    $name:ident ($kind:literal) {
      $( $(#[$inner:meta])* $variant:ident => $text:literal ),* $(,)?
    }
  ) => {
    $(#[$outer])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum $name {
      $( $(#[$inner])* $variant ),*
    }

    impl $name {
      pub fn as_str(&self) -> &'static str {
        match self {
          $( $name::$variant => $text ),*
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl FromStr for $name {
      type Err = TuneError;

      fn from_str(s: &str) -> TuneResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
          $( $text => Ok($name::$variant), )*
          _ => Err(TuneError::UnknownVariant {
            kind: $kind,
            value: s.to_string(),
            expected: concat!($($text, " "),*).trim_end(),
          }),
        }
      }
    }
  };
}

named_enum! {
  /// Operating system the database server runs on.
  OsFamily ("os type") {
    Linux => "linux",
    Windows => "windows",
  }
}

named_enum! {
  /// Expected usage pattern of the database.
  WorkloadClass ("db type") {
    /// Desktop application embedding a local database.
    Desktop => "desktop",
    /// Data warehouse: large scans, few connections.
    Dw => "dw",
    Mixed => "mixed",
    /// Online transaction processing.
    Oltp => "oltp",
    Web => "web",
  }
}

named_enum! {
  /// Storage backing the data directory.
  StorageClass ("harddrive type") {
    Hdd => "hdd",
    Ssd => "ssd",
    San => "san",
  }
}

/// Dotted numeric engine version, ordered component by component.
///
/// `"10"` sorts above `"9.6"`, and a version sorts below any longer version it prefixes
/// (`"9.5" < "9.5.1"`). Pre-release tags are ignored, so `"10beta1"` parses as `10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EngineVersion {
  components: Vec<u64>,
}

impl EngineVersion {
  pub fn new(components: impl Into<Vec<u64>>) -> Self {
    Self {
      components: components.into(),
    }
  }

  /// Compares against a literal version such as `&[9, 6]`.
  pub fn at_least(&self, other: &[u64]) -> bool {
    self.components.as_slice() >= other
  }
}

impl Ord for EngineVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    self.components.cmp(&other.components)
  }
}

impl PartialOrd for EngineVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl FromStr for EngineVersion {
  type Err = TuneError;

  fn from_str(s: &str) -> TuneResult<Self> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(TuneError::InvalidVersion(s.to_string()));
    }
    let components = trimmed
      .split('.')
      .map(numeric_prefix)
      .collect::<Option<Vec<_>>>()
      .ok_or_else(|| TuneError::InvalidVersion(s.to_string()))?;
    Ok(Self { components })
  }
}

/// Leading number of a version component; an alphanumeric pre-release tag after it
/// (`10beta1`, `12rc1`, `16devel`) is dropped.
fn numeric_prefix(part: &str) -> Option<u64> {
  let end = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
  let (digits, tag) = part.split_at(end);
  if !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
    return None;
  }
  digits.parse().ok()
}

impl fmt::Display for EngineVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
    f.write_str(&parts.join("."))
  }
}

impl TryFrom<String> for EngineVersion {
  type Error = TuneError;

  fn try_from(value: String) -> TuneResult<Self> {
    value.parse()
  }
}

impl From<EngineVersion> for String {
  fn from(version: EngineVersion) -> Self {
    version.to_string()
  }
}
