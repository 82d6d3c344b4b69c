// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timestamp and day formatting for API responses.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// RFC3339 with a `Z` suffix and whole seconds (badge awards, registration).
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `YYYY-MM-DD` for streak days.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
