//! Core types for the bike-sharing dashboard.
//!
//! Domain records and categorical recoding, calendar derivation, the shared
//! error type, CLI settings and number formatting.

pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
