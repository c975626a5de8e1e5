//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}

/// Today's calendar date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
