// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar-date handling.

use chrono::NaiveDate;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Truncate a date or timestamp string to its calendar date.
///
/// Accepts `2024-05-01`, `2024-05-01T10:30:00` and `2024-05-01T10:30:00Z`;
/// everything after the `T` separator is dropped.
pub fn truncate_to_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.split('T').next().unwrap_or(raw).trim();
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
