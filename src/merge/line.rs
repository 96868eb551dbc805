use once_cell::sync::Lazy;
use regex::Regex;

use crate::merge::ANNOTATION_MARKER;

/// Leading `key = value`, optionally behind comment markers. Anything after the value
/// (inline comment, line ending) is outside the match.
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[\s#]*(?P<key>[^\s#=]+)\s*=\s*(?P<value>[^\s#]+)").expect("assignment pattern compiles")
});

/// One line of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLine<'a> {
  /// Blank line, pure comment, annotation or anything unparsable.
  Opaque { raw: &'a str },
  /// First top-level `key = value` on the line, commented out or not.
  Assignment {
    raw: &'a str,
    key: &'a str,
    value: &'a str,
    /// Byte offset just past `value`; `raw[assignment_end..]` is kept on rewrite.
    assignment_end: usize,
  },
}

impl<'a> ConfigLine<'a> {
  pub fn parse(raw: &'a str) -> Self {
    if raw.trim_start().starts_with(ANNOTATION_MARKER) {
      return ConfigLine::Opaque { raw };
    }
    match ASSIGNMENT.captures(raw) {
      Some(caps) => match (caps.name("key"), caps.name("value")) {
        (Some(key), Some(value)) => ConfigLine::Assignment {
          raw,
          key: key.as_str(),
          value: value.as_str(),
          assignment_end: value.end(),
        },
        _ => ConfigLine::Opaque { raw },
      },
      None => ConfigLine::Opaque { raw },
    }
  }

  pub fn raw(&self) -> &'a str {
    match self {
      ConfigLine::Opaque { raw } | ConfigLine::Assignment { raw, .. } => *raw,
    }
  }

  pub fn key(&self) -> Option<&'a str> {
    match self {
      ConfigLine::Assignment { key, .. } => Some(*key),
      ConfigLine::Opaque { .. } => None,
    }
  }

  pub fn value(&self) -> Option<&'a str> {
    match self {
      ConfigLine::Assignment { value, .. } => Some(*value),
      ConfigLine::Opaque { .. } => None,
    }
  }

  /// Replaces the assignment (and any leading comment markers) with `key = new_value`,
  /// keeping the rest of the line verbatim. Opaque lines come back unchanged.
  pub fn rewrite(&self, new_value: &str) -> String {
    match self {
      ConfigLine::Assignment {
        raw,
        key,
        assignment_end,
        ..
      } => format!("{} = {}{}", key, new_value, &raw[*assignment_end..]),
      ConfigLine::Opaque { raw } => raw.to_string(),
    }
  }

  /// Line terminator of the raw text, `"\n"` when it has none.
  pub fn line_ending(&self) -> &'static str {
    if self.raw().ends_with("\r\n") {
      "\r\n"
    } else {
      "\n"
    }
  }
}

/// Splits file content into lines, each keeping its own terminator.
pub fn split_lines(content: &str) -> Vec<&str> {
  content.split_inclusive('\n').collect()
}
