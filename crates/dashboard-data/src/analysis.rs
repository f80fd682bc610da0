//! Top-level dashboard pipeline.
//!
//! Loads and enriches both datasets once, then answers any number of
//! date-range queries against the cached enriched view. Each query filters
//! and aggregates into a [`DashboardReport`] ready for presentation.

use chrono::{NaiveDate, Utc};
use dashboard_core::models::{DayRecord, HourRecord};
use dashboard_core::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{
    melt, DailyTotals, HourDayTypeTotals, HourTotals, LongRow, RentalAggregator, RfmSummary,
    SeasonTotals,
};
use crate::enricher::enrich_table;
use crate::filter::{filter_by_date, DateRange};
use crate::reader::DataLoader;

// ── Public types ──────────────────────────────────────────────────────────────

/// Row counts for one dataset through the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    /// Rows dropped while reading or enriching.
    pub rejected: usize,
    /// Enriched rows available before filtering.
    pub loaded: usize,
    /// Rows inside the applied date range.
    pub filtered: usize,
}

/// Metadata produced alongside each report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// The applied range, `None` only when there is no data at all.
    pub range: Option<DateRange>,
    pub day: DatasetStats,
    pub hour: DatasetStats,
    /// Wall-clock seconds spent filtering and aggregating.
    pub aggregate_time_seconds: f64,
}

/// The five aggregate views plus summary metrics.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub daily: Vec<DailyTotals>,
    pub daily_long: Vec<LongRow<NaiveDate>>,
    pub seasons: Vec<SeasonTotals>,
    pub hourly: Vec<HourTotals>,
    pub hourly_by_day_type: Vec<HourDayTypeTotals>,
    pub rfm: RfmSummary,
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Enriched day and hour tables, loaded once.
#[derive(Debug, Clone)]
pub struct Dashboard {
    days: Vec<DayRecord>,
    hours: Vec<HourRecord>,
    day_rejected: usize,
    hour_rejected: usize,
}

impl Dashboard {
    /// Load both datasets through `loader` and enrich them.
    ///
    /// Fails when either dataset is missing or carries an unknown category
    /// code.
    pub fn load(loader: &DataLoader) -> Result<Self> {
        let load_start = std::time::Instant::now();

        let raw_days = loader.load_days()?;
        let raw_hours = loader.load_hours()?;

        let days = enrich_table(&raw_days.rows)?;
        let hours = enrich_table(&raw_hours.rows)?;

        info!(
            "Dashboard ready: {} day rows, {} hour rows in {:.3}s",
            days.rows.len(),
            hours.rows.len(),
            load_start.elapsed().as_secs_f64()
        );

        Ok(Self {
            days: days.rows,
            hours: hours.rows,
            day_rejected: raw_days.rejected + days.rejected,
            hour_rejected: raw_hours.rejected + hours.rejected,
        })
    }

    /// Build a dashboard from already-enriched records.
    pub fn from_records(days: Vec<DayRecord>, hours: Vec<HourRecord>) -> Self {
        Self {
            days,
            hours,
            day_rejected: 0,
            hour_rejected: 0,
        }
    }

    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn hours(&self) -> &[HourRecord] {
        &self.hours
    }

    /// Full span of the day table, the default filter range.
    pub fn full_range(&self) -> Option<DateRange> {
        DateRange::span_of(&self.days)
    }

    /// Resolve optional caller bounds against the day table and report.
    pub fn report_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DashboardReport> {
        let range = DateRange::resolve(start, end, &self.days)?;
        Ok(self.report(range))
    }

    /// Filter both tables to `range` (everything when `None`) and run all
    /// five aggregations.
    pub fn report(&self, range: Option<DateRange>) -> DashboardReport {
        let start = std::time::Instant::now();

        let (days, hours) = match &range {
            Some(r) => (filter_by_date(&self.days, r), filter_by_date(&self.hours, r)),
            None => (self.days.clone(), self.hours.clone()),
        };
        debug!(
            "Filter {:?}: {} day rows, {} hour rows",
            range,
            days.len(),
            hours.len()
        );

        let daily = RentalAggregator::daily_totals(&days);
        let daily_long = melt(&daily);
        let seasons = RentalAggregator::season_totals(&days);
        let hourly = RentalAggregator::hourly_totals(&hours);
        let hourly_by_day_type = RentalAggregator::hourly_by_day_type(&hours);
        let rfm = RentalAggregator::monthly_rfm(&days);

        let metadata = ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            range,
            day: DatasetStats {
                rejected: self.day_rejected,
                loaded: self.days.len(),
                filtered: days.len(),
            },
            hour: DatasetStats {
                rejected: self.hour_rejected,
                loaded: self.hours.len(),
                filtered: hours.len(),
            },
            aggregate_time_seconds: start.elapsed().as_secs_f64(),
        };

        DashboardReport {
            metadata,
            daily,
            daily_long,
            seasons,
            hourly,
            hourly_by_day_type,
            rfm,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::DashboardError;
    use std::path::Path;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.34,0.36,0.80,0.16,100,500,600
2,2011-01-02,1,0,1,0,0,0,2,0.36,0.35,0.69,0.24,50,300,350
3,2011-01-03,1,0,1,0,1,1,1,0.19,0.18,0.43,0.24,120,1229,1349
4,bad-date,1,0,1,0,2,1,1,0.20,0.21,0.59,0.16,108,1454,1562
";

    const HOUR_CSV: &str = "\
instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.28,0.81,0,3,13,16
2,2011-01-01,1,0,1,1,0,6,0,1,0.22,0.27,0.80,0,8,32,40
3,2011-01-02,1,0,1,0,0,0,0,2,0.46,0.43,0.88,0.29,4,13,17
4,2011-01-03,1,0,1,0,0,1,1,1,0.22,0.19,0.44,0.29,0,5,5
5,2011-01-03,1,0,1,8,0,1,1,1,0.20,0.18,0.47,0.19,2,94,96
";

    fn fixture(dir: &Path) -> Dashboard {
        std::fs::write(dir.join("day.csv"), DAY_CSV).unwrap();
        std::fs::write(dir.join("hour.csv"), HOUR_CSV).unwrap();
        Dashboard::load(&DataLoader::new(vec![dir.to_path_buf()])).expect("dashboard")
    }

    #[test]
    fn test_load_counts_rejected_rows() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        assert_eq!(dash.days().len(), 3);
        assert_eq!(dash.hours().len(), 5);

        let report = dash.report(dash.full_range());
        assert_eq!(report.metadata.day.rejected, 1);
        assert_eq!(report.metadata.hour.rejected, 0);
    }

    #[test]
    fn test_missing_hour_dataset_is_fatal() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("day.csv"), DAY_CSV).unwrap();
        let result = Dashboard::load(&DataLoader::new(vec![tmp.path().to_path_buf()]));
        match result {
            Err(DashboardError::DataNotFound { dataset, .. }) => assert_eq!(dataset, "hour"),
            other => panic!("expected DataNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_default_range_is_full_span() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        let report = dash.report_between(None, None).unwrap();

        let range = report.metadata.range.unwrap();
        assert_eq!(range.start(), d(2011, 1, 1));
        assert_eq!(range.end(), d(2011, 1, 3));
        assert_eq!(report.metadata.day.filtered, 3);
        assert_eq!(report.daily.len(), 3);
        assert_eq!(report.daily_long.len(), 9);
    }

    #[test]
    fn test_single_date_range() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        let report = dash
            .report_between(Some(d(2011, 1, 2)), Some(d(2011, 1, 2)))
            .unwrap();

        assert_eq!(report.metadata.day.filtered, 1);
        assert_eq!(report.metadata.hour.filtered, 1);
        assert_eq!(report.daily[0].total, 350);
        assert_eq!(report.hourly.len(), 1);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        let result = dash.report_between(Some(d(2011, 1, 3)), Some(d(2011, 1, 1)));
        assert!(matches!(result, Err(DashboardError::InvalidRange { .. })));
    }

    #[test]
    fn test_empty_range_yields_empty_views() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        let report = dash
            .report_between(Some(d(2012, 6, 1)), Some(d(2012, 6, 30)))
            .unwrap();

        assert!(report.daily.is_empty());
        assert!(report.daily_long.is_empty());
        assert!(report.seasons.is_empty());
        assert!(report.hourly.is_empty());
        assert!(report.hourly_by_day_type.is_empty());
        assert!(report.rfm.months.is_empty());
        assert!(report.rfm.means.is_none());
    }

    #[test]
    fn test_full_report_views() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        let report = dash.report(dash.full_range());

        assert_eq!(report.seasons.len(), 1);
        assert_eq!(report.seasons[0].casual, 270);
        assert_eq!(report.seasons[0].registered, 2029);

        let hours: Vec<u8> = report.hourly.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![0, 1, 8]);
        assert_eq!(report.hourly[0].casual, 7);

        // Hour 0 appears on a Saturday, a Sunday and a Monday.
        let hour_zero: Vec<_> = report
            .hourly_by_day_type
            .iter()
            .filter(|r| r.hour == 0)
            .collect();
        assert_eq!(hour_zero.len(), 2);

        assert_eq!(report.rfm.months.len(), 1);
        let january = &report.rfm.months[0];
        assert_eq!(january.recency, 0);
        assert_eq!(january.frequency, 3);
        assert_eq!(january.monetary, 2299);
        let means = report.rfm.means.unwrap();
        assert_eq!(means.monetary, 2299.0);
    }

    #[test]
    fn test_counts_invariant_holds_after_filter() {
        let tmp = TempDir::new().unwrap();
        let dash = fixture(tmp.path());
        let range = DateRange::new(d(2011, 1, 1), d(2011, 1, 2)).unwrap();
        let days = filter_by_date(dash.days(), &range);
        assert!(days
            .iter()
            .all(|r| r.counts.casual + r.counts.registered == r.counts.total));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let dash = Dashboard::from_records(Vec::new(), Vec::new());
        let report = dash.report(dash.full_range());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["daily"].as_array().unwrap().is_empty());
        assert!(json["rfm"]["means"].is_null());
        assert!(json["metadata"]["range"].is_null());
    }
}
