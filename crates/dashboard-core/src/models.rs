use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarFields;
use crate::error::{DashboardError, Result};

// ── Categorical fields ────────────────────────────────────────────────────────

/// Meteorological season recoded from the raw `season` column.
///
/// Variant order is the natural season order and drives grouped output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Recode a raw integer code (1..=4).
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(DashboardError::UnknownCategory {
                field: "season",
                value: other.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Weather situation recoded from the raw `weathersit` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Misty,
    #[serde(rename = "Light_rainsnow")]
    LightRainSnow,
    #[serde(rename = "Heavy_rainsnow")]
    HeavyRainSnow,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Clear,
        Weather::Misty,
        Weather::LightRainSnow,
        Weather::HeavyRainSnow,
    ];

    /// Recode a raw integer code (1..=4).
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Weather::Clear),
            2 => Ok(Weather::Misty),
            3 => Ok(Weather::LightRainSnow),
            4 => Ok(Weather::HeavyRainSnow),
            other => Err(DashboardError::UnknownCategory {
                field: "weathersit",
                value: other.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Misty => "Misty",
            Weather::LightRainSnow => "Light_rainsnow",
            Weather::HeavyRainSnow => "Heavy_rainsnow",
        }
    }
}

/// Weekend/weekday classification of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    Weekday,
    Weekend,
}

impl DayCategory {
    pub fn label(self) -> &'static str {
        match self {
            DayCategory::Weekday => "weekday",
            DayCategory::Weekend => "weekend",
        }
    }
}

/// Which rental count a long-form row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Casual,
    Registered,
    Total,
}

impl RentalStatus {
    pub fn label(self) -> &'static str {
        match self {
            RentalStatus::Casual => "casual",
            RentalStatus::Registered => "registered",
            RentalStatus::Total => "total",
        }
    }
}

macro_rules! impl_label_traits {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = DashboardError;

            fn from_str(s: &str) -> Result<Self> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.label() == s)
                    .ok_or_else(|| DashboardError::UnknownCategory {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_label_traits!(Season, "season");
impl_label_traits!(Weather, "weathersit");

impl fmt::Display for DayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── CategoryValue ─────────────────────────────────────────────────────────────

/// A raw categorical cell: either the integer code found in the source
/// files, or a label when the table has already been recoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    Code(i64),
    Label(String),
}

impl CategoryValue {
    /// Recode into a [`Season`]. Labels pass through unchanged when valid.
    pub fn to_season(&self) -> Result<Season> {
        match self {
            CategoryValue::Code(code) => Season::from_code(*code),
            CategoryValue::Label(label) => label.trim().parse(),
        }
    }

    /// Recode into a [`Weather`]. Labels pass through unchanged when valid.
    pub fn to_weather(&self) -> Result<Weather> {
        match self {
            CategoryValue::Code(code) => Weather::from_code(*code),
            CategoryValue::Label(label) => label.trim().parse(),
        }
    }
}

// ── Raw rows ──────────────────────────────────────────────────────────────────

/// One row of `day.csv` as read from disk.
///
/// Identifier and redundant columns (`instant`, `yr`, `mnth`, `weekday`,
/// `workingday`) are not mapped and therefore dropped on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDayRecord {
    pub dteday: String,
    pub season: CategoryValue,
    pub holiday: u8,
    pub weathersit: CategoryValue,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u64,
    pub registered: u64,
    pub cnt: u64,
}

/// One row of `hour.csv` as read from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHourRecord {
    pub dteday: String,
    pub hr: u8,
    pub season: CategoryValue,
    pub holiday: u8,
    pub weathersit: CategoryValue,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u64,
    pub registered: u64,
    pub cnt: u64,
}

/// Column names every `day.csv` must carry.
pub const DAY_COLUMNS: &[&str] = &[
    "dteday",
    "season",
    "holiday",
    "weathersit",
    "temp",
    "atemp",
    "hum",
    "windspeed",
    "casual",
    "registered",
    "cnt",
];

/// Column names every `hour.csv` must carry.
pub const HOUR_COLUMNS: &[&str] = &[
    "dteday",
    "hr",
    "season",
    "holiday",
    "weathersit",
    "temp",
    "atemp",
    "hum",
    "windspeed",
    "casual",
    "registered",
    "cnt",
];

// ── Enriched rows ─────────────────────────────────────────────────────────────

/// Casual, registered and total rental counts for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalCounts {
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
}

impl RentalCounts {
    /// `total == casual + registered`.
    pub fn is_consistent(&self) -> bool {
        self.casual + self.registered == self.total
    }
}

/// Normalised weather readings (all in `0.0..=1.0` in the source data).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReadings {
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
}

/// An enriched daily record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub holiday: bool,
    pub weather: Weather,
    pub readings: WeatherReadings,
    pub counts: RentalCounts,
    pub calendar: CalendarFields,
}

/// An enriched hourly record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRecord {
    pub date: NaiveDate,
    /// Hour of day, `0..=23`.
    pub hour: u8,
    pub season: Season,
    pub holiday: bool,
    pub weather: Weather,
    pub readings: WeatherReadings,
    pub counts: RentalCounts,
    pub calendar: CalendarFields,
}

/// Anything that falls on a single calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for DayRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HourRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
