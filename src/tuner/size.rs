//! Human-readable rendering of kilobyte quantities.

const KB_PER_MB: u64 = 1 << 10;
const KB_PER_GB: u64 = 1 << 20;

/// Formats a size given in kB using the largest unit that divides it exactly.
///
/// ```
/// use pgtuner::tuner::format_size;
///
/// assert_eq!(format_size(2 << 20), "2GB");
/// assert_eq!(format_size(512 << 10), "512MB");
/// assert_eq!(format_size(10485), "10485kB");
/// ```
pub fn format_size(size_kb: u64) -> String {
  if size_kb % KB_PER_GB == 0 {
    format!("{}GB", size_kb / KB_PER_GB)
  } else if size_kb % KB_PER_MB == 0 {
    format!("{}MB", size_kb / KB_PER_MB)
  } else {
    format!("{}kB", size_kb)
  }
}
