//! Grouped rental totals behind the five dashboard views.
//!
//! Every view groups through a `BTreeMap`, so output rows come back sorted by
//! their key and an empty input always yields an empty result.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use dashboard_core::formatting::round_to;
use dashboard_core::models::{DayCategory, DayRecord, HourRecord, RentalCounts, RentalStatus, Season};
use serde::Serialize;

// ── RentalTotals ──────────────────────────────────────────────────────────────

/// Running sums of the three rental counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RentalTotals {
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
    /// Number of records folded in.
    pub records: u64,
}

impl RentalTotals {
    pub fn add(&mut self, counts: &RentalCounts) {
        self.casual += counts.casual;
        self.registered += counts.registered;
        self.total += counts.total;
        self.records += 1;
    }
}

// ── View rows ─────────────────────────────────────────────────────────────────

/// View 1: rentals per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
}

/// View 2: rentals per season. The total is intentionally not carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonTotals {
    pub season: Season,
    pub casual: u64,
    pub registered: u64,
}

/// View 3: rentals per hour of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourTotals {
    pub hour: u8,
    pub casual: u64,
    pub registered: u64,
}

/// View 4: rentals per hour of day, split by weekday/weekend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourDayTypeTotals {
    pub hour: u8,
    pub category_days: DayCategory,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
}

/// View 5: recency/frequency/monetary for one calendar month (1..=12).
///
/// Months from different years share a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRfm {
    pub month: u32,
    /// Days between the latest date of the whole filtered range and the
    /// latest date within this month.
    pub recency: i64,
    /// Number of day records in the month.
    pub frequency: u64,
    /// Sum of total rentals in the month.
    pub monetary: u64,
}

/// Means across all months present. Recency and frequency are rounded to one
/// decimal, monetary to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RfmMeans {
    pub recency: f64,
    pub frequency: f64,
    pub monetary: f64,
}

/// Monthly RFM rows plus their means (`None` when there are no rows).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmSummary {
    pub months: Vec<MonthlyRfm>,
    pub means: Option<RfmMeans>,
}

// ── Long-form reshaping ───────────────────────────────────────────────────────

/// One `(key, status, count)` row of a melted view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongRow<K> {
    pub key: K,
    pub status: RentalStatus,
    pub count: u64,
}

/// A grouped view whose measure columns can be melted into long form.
pub trait Melt {
    type Key: Clone;

    /// Measures carried into the long form, in output order.
    const STATUSES: &'static [RentalStatus];

    fn key(&self) -> Self::Key;
    fn count(&self, status: RentalStatus) -> u64;
}

/// Reshape `rows` so each measure becomes its own row tagged by status.
///
/// Output is grouped by status first (all casual rows, then registered, ...),
/// each block in input order.
pub fn melt<R: Melt>(rows: &[R]) -> Vec<LongRow<R::Key>> {
    R::STATUSES
        .iter()
        .flat_map(|&status| {
            rows.iter().map(move |row| LongRow {
                key: row.key(),
                status,
                count: row.count(status),
            })
        })
        .collect()
}

impl Melt for DailyTotals {
    type Key = NaiveDate;
    const STATUSES: &'static [RentalStatus] = &[
        RentalStatus::Casual,
        RentalStatus::Registered,
        RentalStatus::Total,
    ];

    fn key(&self) -> NaiveDate {
        self.date
    }

    fn count(&self, status: RentalStatus) -> u64 {
        match status {
            RentalStatus::Casual => self.casual,
            RentalStatus::Registered => self.registered,
            RentalStatus::Total => self.total,
        }
    }
}

impl Melt for SeasonTotals {
    type Key = Season;
    const STATUSES: &'static [RentalStatus] = &[RentalStatus::Casual, RentalStatus::Registered];

    fn key(&self) -> Season {
        self.season
    }

    fn count(&self, status: RentalStatus) -> u64 {
        match status {
            RentalStatus::Casual => self.casual,
            RentalStatus::Registered => self.registered,
            RentalStatus::Total => self.casual + self.registered,
        }
    }
}

impl Melt for HourTotals {
    type Key = u8;
    const STATUSES: &'static [RentalStatus] = &[RentalStatus::Casual, RentalStatus::Registered];

    fn key(&self) -> u8 {
        self.hour
    }

    fn count(&self, status: RentalStatus) -> u64 {
        match status {
            RentalStatus::Casual => self.casual,
            RentalStatus::Registered => self.registered,
            RentalStatus::Total => self.casual + self.registered,
        }
    }
}

// ── RentalAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups enriched records into the dashboard views.
pub struct RentalAggregator;

impl RentalAggregator {
    /// View 1: group day records by date.
    pub fn daily_totals(days: &[DayRecord]) -> Vec<DailyTotals> {
        Self::aggregate_by_key(days, |d| d.date, |d| &d.counts)
            .into_iter()
            .map(|(date, t)| DailyTotals {
                date,
                casual: t.casual,
                registered: t.registered,
                total: t.total,
            })
            .collect()
    }

    /// View 2: group day records by season, in natural season order.
    pub fn season_totals(days: &[DayRecord]) -> Vec<SeasonTotals> {
        Self::aggregate_by_key(days, |d| d.season, |d| &d.counts)
            .into_iter()
            .map(|(season, t)| SeasonTotals {
                season,
                casual: t.casual,
                registered: t.registered,
            })
            .collect()
    }

    /// View 3: group hour records by hour of day.
    pub fn hourly_totals(hours: &[HourRecord]) -> Vec<HourTotals> {
        Self::aggregate_by_key(hours, |h| h.hour, |h| &h.counts)
            .into_iter()
            .map(|(hour, t)| HourTotals {
                hour,
                casual: t.casual,
                registered: t.registered,
            })
            .collect()
    }

    /// View 4: group hour records by `(hour, category_days)`.
    pub fn hourly_by_day_type(hours: &[HourRecord]) -> Vec<HourDayTypeTotals> {
        Self::aggregate_by_key(
            hours,
            |h| (h.hour, h.calendar.category_days),
            |h| &h.counts,
        )
        .into_iter()
        .map(|((hour, category_days), t)| HourDayTypeTotals {
            hour,
            category_days,
            casual: t.casual,
            registered: t.registered,
            total: t.total,
        })
        .collect()
    }

    /// View 5: recency/frequency/monetary per calendar month.
    ///
    /// Recency is measured against the latest date of the whole input, not
    /// per month.
    pub fn monthly_rfm(days: &[DayRecord]) -> RfmSummary {
        match days.iter().map(|d| d.date).max() {
            Some(latest) => Self::monthly_rfm_as_of(days, latest),
            None => RfmSummary {
                months: Vec::new(),
                means: None,
            },
        }
    }

    /// Monthly RFM with recency measured from an explicit reference date.
    pub fn monthly_rfm_as_of(days: &[DayRecord], reference: NaiveDate) -> RfmSummary {
        let mut map: BTreeMap<u32, (NaiveDate, u64, u64)> = BTreeMap::new();
        for day in days {
            let slot = map
                .entry(day.calendar.month)
                .or_insert((day.date, 0, 0));
            slot.0 = slot.0.max(day.date);
            slot.1 += 1;
            slot.2 += day.counts.total;
        }

        let months: Vec<MonthlyRfm> = map
            .into_iter()
            .map(|(month, (month_latest, frequency, monetary))| MonthlyRfm {
                month,
                recency: (reference - month_latest).num_days(),
                frequency,
                monetary,
            })
            .collect();

        let means = Self::rfm_means(&months);
        RfmSummary { months, means }
    }

    /// Arithmetic means of the RFM columns, or `None` for no months.
    pub fn rfm_means(months: &[MonthlyRfm]) -> Option<RfmMeans> {
        if months.is_empty() {
            return None;
        }
        let n = months.len() as f64;
        let recency = months.iter().map(|m| m.recency as f64).sum::<f64>() / n;
        let frequency = months.iter().map(|m| m.frequency as f64).sum::<f64>() / n;
        let monetary = months.iter().map(|m| m.monetary as f64).sum::<f64>() / n;
        Some(RfmMeans {
            recency: round_to(recency, 1),
            frequency: round_to(frequency, 1),
            monetary: round_to(monetary, 0),
        })
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic grouping driver; keys come back in ascending order.
    fn aggregate_by_key<T, K: Ord>(
        records: &[T],
        key_fn: impl Fn(&T) -> K,
        counts_fn: impl Fn(&T) -> &RentalCounts,
    ) -> BTreeMap<K, RentalTotals> {
        let mut map: BTreeMap<K, RentalTotals> = BTreeMap::new();
        for record in records {
            map.entry(key_fn(record))
                .or_default()
                .add(counts_fn(record));
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
