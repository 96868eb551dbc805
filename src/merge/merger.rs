use chrono::NaiveDate;

use crate::merge::line::ConfigLine;
use crate::merge::ANNOTATION_MARKER;
use crate::tuner::ParameterSet;

/// Outcome of reconciling a file's lines with a parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
  /// Full output, one entry per line, each carrying its own terminator.
  pub new_lines: Vec<String>,
  /// Keys rewritten in place, in order of first rewrite.
  pub updated_keys: Vec<String>,
  /// Keys appended at the end of the file. Disjoint from `updated_keys`.
  pub added_keys: Vec<String>,
  pub changed: bool,
}

impl MergeResult {
  /// The merged file content.
  pub fn content(&self) -> String {
    self.new_lines.concat()
  }

  /// Human-readable summary such as `parameters work_mem updated; parameters wal_buffers added`.
  pub fn message(&self) -> String {
    let mut parts = Vec::new();
    if !self.updated_keys.is_empty() {
      parts.push(format!("parameters {} updated", self.updated_keys.join(", ")));
    }
    if !self.added_keys.is_empty() {
      parts.push(format!("parameters {} added", self.added_keys.join(", ")));
    }
    parts.join("; ")
  }
}

fn updated_annotation(date: NaiveDate, previous: &str, ending: &str) -> String {
  format!(
    "{} updated on {} (previous value: {}){}",
    ANNOTATION_MARKER,
    date.format("%Y-%m-%d"),
    previous,
    ending
  )
}

fn added_annotation(date: NaiveDate) -> String {
  format!("{} added on {}\n", ANNOTATION_MARKER, date.format("%Y-%m-%d"))
}

/// Reconciles `existing_lines` with `params`.
///
/// Every assignment whose key is in `params` is checked independently: a matching value is
/// left alone, a differing one is rewritten in place (uncommenting it if needed) beneath an
/// annotation recording `date` and the previous value. Keys never seen in the file are
/// appended, each under its own annotation. All other lines pass through verbatim.
///
/// Running `merge` again on `new_lines` with the same `params` changes nothing.
pub fn merge<S: AsRef<str>>(existing_lines: &[S], params: &ParameterSet, date: NaiveDate) -> MergeResult {
  let mut result = MergeResult::default();
  let mut pending: Vec<&str> = params.keys().collect();

  for raw in existing_lines {
    let line = ConfigLine::parse(raw.as_ref());
    let (key, value) = match (line.key(), line.value()) {
      (Some(key), Some(value)) => (key, value),
      _ => {
        result.new_lines.push(line.raw().to_string());
        continue;
      }
    };
    let target = match params.get(key) {
      Some(target) => target.to_string(),
      None => {
        result.new_lines.push(line.raw().to_string());
        continue;
      }
    };

    pending.retain(|k| *k != key);
    if value == target {
      log::debug!("[Merge] '{}' already set to {}", key, target);
      result.new_lines.push(line.raw().to_string());
      continue;
    }

    log::debug!("[Merge] Updating '{}': {} -> {}", key, value, target);
    result.new_lines.push(updated_annotation(date, value, line.line_ending()));
    result.new_lines.push(line.rewrite(&target));
    if !result.updated_keys.iter().any(|k| k == key) {
      result.updated_keys.push(key.to_string());
    }
  }

  if !pending.is_empty() {
    if let Some(last) = result.new_lines.last_mut() {
      if !last.ends_with('\n') {
        last.push('\n');
      }
    }
    for key in pending {
      // pending only holds keys of `params`
      if let Some(value) = params.get(key) {
        log::debug!("[Merge] Appending '{}' = {}", key, value);
        result.new_lines.push(added_annotation(date));
        result.new_lines.push(format!("{} = {}\n", key, value));
        result.added_keys.push(key.to_string());
      }
    }
  }

  result.changed = !result.updated_keys.is_empty() || !result.added_keys.is_empty();
  result
}
