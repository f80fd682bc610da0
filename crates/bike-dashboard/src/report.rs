//! Plain-text and JSON rendering of a [`DashboardReport`].

use std::collections::BTreeMap;
use std::fmt::Write as _;

use dashboard_core::formatting::{format_count, format_number};
use dashboard_core::models::DayCategory;
use dashboard_data::analysis::DashboardReport;

const NO_DATA: &str = "  (no data in range)\n";

/// Pretty-printed JSON of the whole report.
pub fn render_json(report: &DashboardReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render the five dashboard sections and the summary metrics as text.
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();
    let meta = &report.metadata;

    out.push_str("Bike Sharing Analysis Dashboard\n");
    match &meta.range {
        Some(range) => {
            let _ = writeln!(out, "Range: {} .. {}", range.start(), range.end());
        }
        None => out.push_str("Range: (no data)\n"),
    }
    let _ = writeln!(
        out,
        "Rows: {} of {} days, {} of {} hours",
        meta.day.filtered, meta.day.loaded, meta.hour.filtered, meta.hour.loaded
    );

    // ── 1. Daily trend ──
    section(&mut out, "1. Rental trend by date");
    let rows = report
        .daily
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                format_count(r.casual),
                format_count(r.registered),
                format_count(r.total),
            ]
        })
        .collect();
    out.push_str(&render_table(&["date", "casual", "registered", "total"], rows));

    // ── 2. Seasons ──
    section(&mut out, "2. Rentals per season");
    let rows = report
        .seasons
        .iter()
        .map(|r| {
            vec![
                r.season.to_string(),
                format_count(r.casual),
                format_count(r.registered),
            ]
        })
        .collect();
    out.push_str(&render_table(&["season", "casual", "registered"], rows));

    // ── 3. Hours ──
    section(&mut out, "3. Rentals per hour");
    let rows = report
        .hourly
        .iter()
        .map(|r| {
            vec![
                format!("{:02}", r.hour),
                format_count(r.casual),
                format_count(r.registered),
            ]
        })
        .collect();
    out.push_str(&render_table(&["hour", "casual", "registered"], rows));

    // ── 4. Hours by day type (total, pivoted) ──
    section(&mut out, "4. Rentals per hour, weekday vs weekend");
    let mut pivot: BTreeMap<u8, (Option<u64>, Option<u64>)> = BTreeMap::new();
    for r in &report.hourly_by_day_type {
        let slot = pivot.entry(r.hour).or_default();
        match r.category_days {
            DayCategory::Weekday => slot.0 = Some(r.total),
            DayCategory::Weekend => slot.1 = Some(r.total),
        }
    }
    let rows = pivot
        .into_iter()
        .map(|(hour, (weekday, weekend))| {
            vec![
                format!("{:02}", hour),
                weekday.map(format_count).unwrap_or_else(|| "-".to_string()),
                weekend.map(format_count).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    out.push_str(&render_table(&["hour", "weekday", "weekend"], rows));

    // ── 5. RFM ──
    section(&mut out, "5. RFM analysis per month");
    let rows = report
        .rfm
        .months
        .iter()
        .map(|m| {
            vec![
                m.month.to_string(),
                m.recency.to_string(),
                m.frequency.to_string(),
                format_count(m.monetary),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["month", "recency", "frequency", "monetary"],
        rows,
    ));

    out.push('\n');
    match &report.rfm.means {
        Some(means) => {
            let _ = writeln!(
                out,
                "Avg Recency (days): {}   Avg Frequency: {}   Avg Monetary (Rental Count): {}",
                format_number(means.recency, 1),
                format_number(means.frequency, 1),
                format_number(means.monetary, 0)
            );
        }
        None => out.push_str("Avg Recency (days): -   Avg Frequency: -   Avg Monetary: -\n"),
    }

    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "-".repeat(title.chars().count()));
}

/// Left-align the first column, right-align the rest.
fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push_str("  ");
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        if i == 0 {
            let _ = write!(out, "{:<width$}", cell, width = widths[i]);
        } else {
            let _ = write!(out, "{:>width$}", cell, width = widths[i]);
        }
    }
    out.push('\n');
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::calendar::CalendarFields;
    use dashboard_core::models::{
        DayRecord, HourRecord, RentalCounts, Season, Weather, WeatherReadings,
    };
    use dashboard_data::analysis::Dashboard;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn counts(casual: u64, registered: u64) -> RentalCounts {
        RentalCounts {
            casual,
            registered,
            total: casual + registered,
        }
    }

    fn sample_dashboard() -> Dashboard {
        let days = vec![
            DayRecord {
                date: d(2011, 1, 1),
                season: Season::Spring,
                holiday: false,
                weather: Weather::Misty,
                readings: WeatherReadings::default(),
                counts: counts(100, 500),
                calendar: CalendarFields::derive(d(2011, 1, 1)),
            },
            DayRecord {
                date: d(2011, 1, 2),
                season: Season::Spring,
                holiday: false,
                weather: Weather::Clear,
                readings: WeatherReadings::default(),
                counts: counts(1_050, 300),
                calendar: CalendarFields::derive(d(2011, 1, 2)),
            },
        ];
        let hours = vec![HourRecord {
            date: d(2011, 1, 1),
            hour: 7,
            season: Season::Spring,
            holiday: false,
            weather: Weather::Clear,
            readings: WeatherReadings::default(),
            counts: counts(3, 13),
            calendar: CalendarFields::derive(d(2011, 1, 1)),
        }];
        Dashboard::from_records(days, hours)
    }

    #[test]
    fn test_render_text_sections() {
        let dash = sample_dashboard();
        let text = render_text(&dash.report(dash.full_range()));

        assert!(text.contains("Range: 2011-01-01 .. 2011-01-02"));
        assert!(text.contains("1. Rental trend by date"));
        assert!(text.contains("2. Rentals per season"));
        assert!(text.contains("3. Rentals per hour"));
        assert!(text.contains("4. Rentals per hour, weekday vs weekend"));
        assert!(text.contains("5. RFM analysis per month"));
        assert!(text.contains("1,350"));
        assert!(text.contains("Spring"));
        assert!(text.contains("Avg Monetary (Rental Count): 1,950"));
    }

    #[test]
    fn test_render_text_empty_report() {
        let dash = Dashboard::from_records(Vec::new(), Vec::new());
        let text = render_text(&dash.report(None));
        assert!(text.contains("Range: (no data)"));
        assert_eq!(text.matches("(no data in range)").count(), 5);
        assert!(text.contains("Avg Recency (days): -"));
    }

    #[test]
    fn test_render_json() {
        let dash = sample_dashboard();
        let json = render_json(&dash.report(dash.full_range())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["daily"].as_array().unwrap().len(), 2);
        assert_eq!(value["daily_long"].as_array().unwrap().len(), 6);
        assert_eq!(value["seasons"][0]["season"], "Spring");
        assert_eq!(value["hourly_by_day_type"][0]["category_days"], "weekend");
    }

    #[test]
    fn test_render_table_alignment() {
        let table = render_table(
            &["k", "value"],
            vec![
                vec!["a".to_string(), "1".to_string()],
                vec!["bb".to_string(), "1,000".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "  k   value");
        assert_eq!(lines[1], "  a       1");
        assert_eq!(lines[2], "  bb  1,000");
    }
}
