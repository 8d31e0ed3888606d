//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for cycle starts, step starts and status lines.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Whole milliseconds elapsed between `since` and `until`, clamped at zero.
#[must_use]
pub fn elapsed_ms(since: Timestamp, until: Timestamp) -> u64 {
    u64::try_from((until - since).num_milliseconds()).unwrap_or(0)
}
