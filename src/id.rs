//! Run identifiers
//!
//! Every activity run gets an identifier that shows up in log lines and in the
//! run summary, so a log file holding several runs can be split apart.

use std::sync::atomic::{AtomicU16, Ordering};

static RUN_COUNTER: AtomicU16 = AtomicU16::new(0);

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Generate a unique run ID for an activity
///
/// Format: `{activity}-{timestamp_ms}-{counter_hex}`
/// Example: `fishing-1738300800123-0001`
pub fn generate_run_id(activity: &str) -> String {
    let counter = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{:04x}", activity, now_ms(), counter)
}
