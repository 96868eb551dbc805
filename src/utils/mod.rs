use crate::error::{TuneError, TuneResult};

use chrono::Local;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How a configuration file's bytes were turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
  Utf8,
  /// Every byte maps to the char with the same value, so encoding back is lossless.
  Latin1,
}

/// Decodes file contents, falling back to Latin-1 when they are not valid UTF-8.
pub fn decode_text(bytes: Vec<u8>) -> (String, TextEncoding) {
  match String::from_utf8(bytes) {
    Ok(text) => (text, TextEncoding::Utf8),
    Err(e) => {
      let text = e.into_bytes().into_iter().map(char::from).collect();
      (text, TextEncoding::Latin1)
    }
  }
}

/// Encodes `text` back into the encoding it was read with.
///
/// # Errors
/// `Other` if a Latin-1 file would receive a char above U+00FF.
pub fn encode_text(text: &str, encoding: TextEncoding) -> TuneResult<Vec<u8>> {
  match encoding {
    TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
    TextEncoding::Latin1 => text
      .chars()
      .map(|c| {
        u8::try_from(u32::from(c)).map_err(|_| TuneError::Other(format!("Cannot write {:?} as Latin-1", c)))
      })
      .collect(),
  }
}

/// Fails unless `path` is an existing non-directory.
///
/// # Errors
/// `PathIsDirectory` or `PathNotFound`, checked in that order.
pub fn check_target(path: &Path) -> TuneResult<()> {
  if path.is_dir() {
    return Err(TuneError::PathIsDirectory(path.to_path_buf()));
  }
  if !path.exists() {
    return Err(TuneError::PathNotFound(path.to_path_buf()));
  }
  Ok(())
}

/// Returns the file a write to `path` should replace.
///
/// With `follow` set and `path` a symlink, this is the canonical link target; otherwise
/// `path` itself (replacing it then replaces the link with a regular file).
pub fn resolve_target(path: &Path, follow: bool) -> TuneResult<PathBuf> {
  let is_link = fs::symlink_metadata(path)
    .map(|meta| meta.file_type().is_symlink())
    .unwrap_or(false);
  if follow && is_link {
    let resolved = fs::canonicalize(path)?;
    debug!("[Apply] Following symlink '{}' to '{}'", path.display(), resolved.display());
    return Ok(resolved);
  }
  Ok(path.to_path_buf())
}

/// Copies `path` to `<name>.<pid>.<YYYY-MM-DD@HH-MM-SS>~` beside it.
///
/// # Errors
/// Returns `TuneError::Io` if the copy fails.
pub fn backup_file(path: &Path) -> TuneResult<PathBuf> {
  let file_name = path
    .file_name()
    .ok_or_else(|| TuneError::Other(format!("Cannot back up '{}': no file name", path.display())))?
    .to_string_lossy()
    .into_owned();
  let stamp = Local::now().format("%Y-%m-%d@%H-%M-%S");
  let backup_path = path.with_file_name(format!("{}.{}.{}~", file_name, std::process::id(), stamp));

  fs::copy(path, &backup_path)?;
  info!("[Apply] Backed up '{}' to '{}'", path.display(), backup_path.display());
  Ok(backup_path)
}

/// Replaces `path` with `contents` so readers see either the old or the new file.
///
/// The data goes to a temporary file in the same directory, which inherits the permission
/// bits of the existing file and is then renamed over it.
///
/// # Errors
/// Returns `TuneError::Io` if writing, syncing or renaming fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> TuneResult<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  };

  let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
  tmp.write_all(contents)?;
  tmp.as_file().sync_all()?;

  if let Ok(meta) = fs::metadata(path) {
    fs::set_permissions(tmp.path(), meta.permissions())?;
  }

  tmp.persist(path).map_err(|e| TuneError::Io(e.error))?;
  info!("[Apply] Wrote {} bytes to '{}'", contents.len(), path.display());
  Ok(())
}
