use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::models::DayCategory;

// ── Date parsing ──────────────────────────────────────────────────────────────

/// Parse a calendar date from the `dteday` column.
///
/// Accepts a bare ISO date (`2011-01-01`), slash forms, and datetime strings
/// whose time component is discarded.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::DateParse(s.to_string()));
    }

    const DATE_FMTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for fmt in DATE_FMTS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }

    const DATETIME_FMTS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }

    Err(DashboardError::DateParse(s.to_string()))
}

// ── Derived fields ────────────────────────────────────────────────────────────

/// Full English name of an ISO weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// ISO-8601 week number (1..=53).
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Saturday and Sunday are the weekend; every other day is a weekday.
pub fn category_days(date: NaiveDate) -> DayCategory {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayCategory::Weekend,
        _ => DayCategory::Weekday,
    }
}

/// Calendar fields derived from a record's date.
///
/// Every field is a pure function of the date, so deriving twice from the
/// same date always yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_name: String,
    /// ISO-8601 week number.
    pub week: u32,
    pub category_days: DayCategory,
}

impl CalendarFields {
    pub fn derive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_name: weekday_name(date.weekday()).to_string(),
            week: iso_week(date),
            category_days: category_days(date),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
