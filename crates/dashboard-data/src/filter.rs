//! Inclusive date-range filtering of enriched tables.

use chrono::NaiveDate;
use dashboard_core::models::Dated;
use dashboard_core::{DashboardError, Result};
use serde::Serialize;

/// An inclusive `[start, end]` date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Fails with [`DashboardError::InvalidRange`] when `start > end`.
    /// The bounds are never swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The full span of dates in `records`, or `None` when it is empty.
    pub fn span_of<T: Dated>(records: &[T]) -> Option<Self> {
        let start = records.iter().map(|r| r.date()).min()?;
        let end = records.iter().map(|r| r.date()).max()?;
        Some(Self { start, end })
    }

    /// Build a range from optional caller bounds, filling each missing bound
    /// from the span of `records`.
    ///
    /// Returns `Ok(None)` only when a bound is missing and `records` is empty.
    pub fn resolve<T: Dated>(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        records: &[T],
    ) -> Result<Option<Self>> {
        let span = Self::span_of(records);
        let start = start.or(span.map(|s| s.start));
        let end = end.or(span.map(|s| s.end));
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Ok(None),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both bounds inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Rows of `records` whose date falls inside `range`, in their original order.
pub fn filter_by_date<T: Dated + Clone>(records: &[T], range: &DateRange) -> Vec<T> {
    records
        .iter()
        .filter(|r| range.contains(r.date()))
        .cloned()
        .collect()
}

/// Validate `[start, end]` and filter `records` to it.
pub fn filter_range<T: Dated + Clone>(
    records: &[T],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<T>> {
    let range = DateRange::new(start, end)?;
    Ok(filter_by_date(records, &range))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Stamp(NaiveDate);

    impl Dated for Stamp {
        fn date(&self) -> NaiveDate {
            self.0
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn stamps() -> Vec<Stamp> {
        (1..=10).map(|day| Stamp(d(2011, 3, day))).collect()
    }

    #[test]
    fn test_start_after_end_is_invalid() {
        let err = DateRange::new(d(2011, 3, 5), d(2011, 3, 4)).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRange { .. }));
        assert!(filter_range(&stamps(), d(2012, 1, 1), d(2011, 1, 1)).is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let rows = filter_range(&stamps(), d(2011, 3, 3), d(2011, 3, 5)).unwrap();
        let days: Vec<NaiveDate> = rows.iter().map(|s| s.0).collect();
        assert_eq!(days, vec![d(2011, 3, 3), d(2011, 3, 4), d(2011, 3, 5)]);
    }

    #[test]
    fn test_single_day_range() {
        let rows = filter_by_date(&stamps(), &DateRange::single(d(2011, 3, 7)));
        assert_eq!(rows, vec![Stamp(d(2011, 3, 7))]);
    }

    #[test]
    fn test_range_outside_data_is_empty_not_error() {
        let rows = filter_range(&stamps(), d(2012, 1, 1), d(2012, 1, 31)).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_span_of() {
        let span = DateRange::span_of(&stamps()).unwrap();
        assert_eq!(span.start(), d(2011, 3, 1));
        assert_eq!(span.end(), d(2011, 3, 10));
        assert!(DateRange::span_of::<Stamp>(&[]).is_none());
    }

    #[test]
    fn test_resolve_fills_missing_bounds() {
        let range = DateRange::resolve(None, Some(d(2011, 3, 4)), &stamps())
            .unwrap()
            .unwrap();
        assert_eq!(range.start(), d(2011, 3, 1));
        assert_eq!(range.end(), d(2011, 3, 4));

        let full = DateRange::resolve(None, None, &stamps()).unwrap().unwrap();
        assert_eq!(full, DateRange::span_of(&stamps()).unwrap());
    }

    #[test]
    fn test_resolve_validates_order() {
        let result = DateRange::resolve(Some(d(2011, 3, 9)), Some(d(2011, 3, 2)), &stamps());
        assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
    }

    #[test]
    fn test_resolve_empty_records() {
        assert_eq!(DateRange::resolve::<Stamp>(None, None, &[]).unwrap(), None);
        let explicit =
            DateRange::resolve::<Stamp>(Some(d(2011, 1, 1)), Some(d(2011, 1, 2)), &[]).unwrap();
        assert!(explicit.is_some());
    }
}
