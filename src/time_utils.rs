// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar-day matching.

use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar date (UTC) of a timestamp.
pub fn utc_date(timestamp: &DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Today's calendar date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse an optional `date` query parameter.
///
/// Accepts `YYYY-MM-DD` or a full RFC3339 timestamp (whose UTC date is
/// used). A missing or blank value means `today`.
pub fn parse_date_param(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(today),
        Some(raw) => raw,
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            AppError::Validation(
                "Invalid 'date' parameter: expected YYYY-MM-DD or RFC3339 datetime".to_string(),
            )
        })
}

/// Parse a caller-supplied timestamp.
///
/// Accepts a full RFC3339 timestamp or a bare `YYYY-MM-DD`, which is taken
/// as midnight UTC on that day.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid 'date': expected YYYY-MM-DD or RFC3339 datetime".to_string(),
            )
        })
}
