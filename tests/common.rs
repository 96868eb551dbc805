#![allow(dead_code)]

use std::sync::Once;

use chrono::NaiveDate;

static LOG_INIT: Once = Once::new();

pub fn setup_logging() {
  LOG_INIT.call_once(|| {
    env_logger::builder()
      .is_test(true)
      .try_init()
      .unwrap_or_else(|e| eprintln!("Failed to init logger: {}", e));
  });
}

/// Fixed annotation date so expected file contents are stable.
pub fn run_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Excerpt of a stock postgresql.conf.
pub const STOCK_CONF: &str = "\
# -----------------------------
# PostgreSQL configuration file
# -----------------------------

listen_addresses = '*'\t\t# what IP address(es) to listen on;
max_connections = 100\t\t\t# (change requires restart)

# - Memory -

shared_buffers = 128MB\t\t\t# min 128kB
#work_mem = 4MB\t\t\t\t# min 64kB
#maintenance_work_mem = 64MB\t\t# min 1MB

#random_page_cost = 4.0\t\t\t# same scale as above
#effective_cache_size = 4GB
";
