//! Raw rows → enriched, typed records.
//!
//! Categorical codes are recoded into their enums, calendar fields are derived
//! from the date, and rows that cannot be interpreted are rejected.

use dashboard_core::calendar::{parse_date, CalendarFields};
use dashboard_core::models::{
    DayRecord, HourRecord, RawDayRecord, RawHourRecord, RentalCounts, WeatherReadings,
};
use dashboard_core::{DashboardError, Result};
use tracing::{debug, warn};

/// Conversion of one row into its enriched form.
///
/// Implemented for raw rows and for already-enriched records, so enriching
/// an enriched table is a no-op.
pub trait Enrich {
    type Output;

    /// Row-level failures are reported through
    /// [`DashboardError::is_row_level`]; anything else is fatal.
    fn enrich(&self) -> Result<Self::Output>;
}

/// An enriched table and the number of rows dropped along the way.
#[derive(Debug, Clone)]
pub struct Enriched<T> {
    pub rows: Vec<T>,
    pub rejected: usize,
}

/// Enrich every row of `rows`.
///
/// Rows with a malformed date, an out-of-range hour, or inconsistent counts
/// are skipped with a warning. An unknown category code aborts the whole
/// table with [`DashboardError::UnknownCategory`].
pub fn enrich_table<R: Enrich>(rows: &[R]) -> Result<Enriched<R::Output>> {
    let mut out = Vec::with_capacity(rows.len());
    let mut rejected = 0usize;

    for (index, row) in rows.iter().enumerate() {
        match row.enrich() {
            Ok(record) => out.push(record),
            Err(e) if e.is_row_level() => {
                rejected += 1;
                warn!("Row {}: rejected: {}", index, e);
            }
            Err(e) => return Err(e),
        }
    }

    debug!("Enriched {} rows, rejected {}", out.len(), rejected);
    Ok(Enriched { rows: out, rejected })
}

// ── Implementations ───────────────────────────────────────────────────────────

fn checked_counts(casual: u64, registered: u64, total: u64) -> Result<RentalCounts> {
    let counts = RentalCounts {
        casual,
        registered,
        total,
    };
    if counts.is_consistent() {
        Ok(counts)
    } else {
        Err(DashboardError::InvalidRow(format!(
            "cnt {} != casual {} + registered {}",
            total, casual, registered
        )))
    }
}

fn checked_hour(hour: u8) -> Result<u8> {
    if hour < 24 {
        Ok(hour)
    } else {
        Err(DashboardError::InvalidRow(format!("hr {} outside 0..=23", hour)))
    }
}

impl Enrich for RawDayRecord {
    type Output = DayRecord;

    fn enrich(&self) -> Result<DayRecord> {
        let date = parse_date(&self.dteday)?;
        Ok(DayRecord {
            date,
            season: self.season.to_season()?,
            holiday: self.holiday != 0,
            weather: self.weathersit.to_weather()?,
            readings: WeatherReadings {
                temp: self.temp,
                atemp: self.atemp,
                hum: self.hum,
                windspeed: self.windspeed,
            },
            counts: checked_counts(self.casual, self.registered, self.cnt)?,
            calendar: CalendarFields::derive(date),
        })
    }
}

impl Enrich for RawHourRecord {
    type Output = HourRecord;

    fn enrich(&self) -> Result<HourRecord> {
        let date = parse_date(&self.dteday)?;
        Ok(HourRecord {
            date,
            hour: checked_hour(self.hr)?,
            season: self.season.to_season()?,
            holiday: self.holiday != 0,
            weather: self.weathersit.to_weather()?,
            readings: WeatherReadings {
                temp: self.temp,
                atemp: self.atemp,
                hum: self.hum,
                windspeed: self.windspeed,
            },
            counts: checked_counts(self.casual, self.registered, self.cnt)?,
            calendar: CalendarFields::derive(date),
        })
    }
}

impl Enrich for DayRecord {
    type Output = DayRecord;

    fn enrich(&self) -> Result<DayRecord> {
        let counts = self.counts;
        checked_counts(counts.casual, counts.registered, counts.total)?;
        Ok(DayRecord {
            calendar: CalendarFields::derive(self.date),
            ..self.clone()
        })
    }
}

impl Enrich for HourRecord {
    type Output = HourRecord;

    fn enrich(&self) -> Result<HourRecord> {
        let counts = self.counts;
        checked_counts(counts.casual, counts.registered, counts.total)?;
        checked_hour(self.hour)?;
        Ok(HourRecord {
            calendar: CalendarFields::derive(self.date),
            ..self.clone()
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
