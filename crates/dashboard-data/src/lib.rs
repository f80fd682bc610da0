//! Data pipeline for the bike-sharing dashboard.
//!
//! Responsible for locating and reading the `day` and `hour` CSV datasets,
//! enriching them with calendar and categorical fields, filtering by date
//! range, and producing the aggregate views consumed by the presentation
//! layer.

pub mod aggregator;
pub mod analysis;
pub mod enricher;
pub mod filter;
pub mod reader;

pub use dashboard_core as core;
