// ABOUTME: Publish-time policies deciding what timestamp to send per backend
// ABOUTME: Pure functions of (date, now) so tests can pin the clock

use chrono::{DateTime, Utc};

/// REST-style rule: send a timestamp only when it is strictly in the future.
/// Past or absent dates are omitted so the backend defaults to "publish now"
/// (this class of backend rejects past-dated `published_at` values).
pub fn future_only(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    date.filter(|d| *d > now)
}

/// Query-API rule: the timestamp (or absence) passes through unconditionally;
/// this class of backend accepts past dates as-is.
pub fn passthrough(date: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    date
}
