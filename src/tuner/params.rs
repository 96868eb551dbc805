use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Parameters whose natural unit is a count, ratio or cost factor. Everything else the
/// calculator produces is a kB quantity rendered through `format_size`.
pub const NEVER_SIZE_FORMATTED: &[&str] = &[
  "max_connections",
  "checkpoint_segments",
  "checkpoint_completion_target",
  "default_statistics_target",
  "random_page_cost",
  "effective_io_concurrency",
  "max_worker_processes",
  "max_parallel_workers_per_gather",
  "max_parallel_workers",
];

pub fn is_size_formatted(key: &str) -> bool {
  !NEVER_SIZE_FORMATTED.contains(&key)
}

/// A recommended value as it will be written to the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
  /// Formatted size such as `512MB`.
  Size(String),
  Integer(u64),
  Ratio(f64),
}

impl fmt::Display for ParamValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ParamValue::Size(s) => f.write_str(s),
      ParamValue::Integer(n) => write!(f, "{}", n),
      ParamValue::Ratio(r) => write!(f, "{}", r),
    }
  }
}

impl Serialize for ParamValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      ParamValue::Size(s) => serializer.serialize_str(s),
      ParamValue::Integer(n) => serializer.serialize_u64(*n),
      ParamValue::Ratio(r) => serializer.serialize_f64(*r),
    }
  }
}

/// Insertion-ordered mapping from parameter name to recommended value.
///
/// A missing key means the parameter does not apply to the engine version or platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
  entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts or replaces `key`, keeping its original position on replace.
  pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
    let key = key.into();
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((key, value)),
    }
  }

  pub fn get(&self, key: &str) -> Option<&ParamValue> {
    self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.get(key).is_some()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(k, _)| k.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
    self.entries.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<K: Into<String>> FromIterator<(K, ParamValue)> for ParameterSet {
  fn from_iter<I: IntoIterator<Item = (K, ParamValue)>>(iter: I) -> Self {
    let mut set = ParameterSet::new();
    for (k, v) in iter {
      set.insert(k, v);
    }
    set
  }
}

impl Serialize for ParameterSet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (k, v) in &self.entries {
      map.serialize_entry(k, v)?;
    }
    map.end()
  }
}
