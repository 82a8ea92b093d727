//! Core data models for Mediatone
//!
//! This module contains the types shared across the fetch pipeline and the
//! analysis/report layers: query descriptors identifying one GDELT request
//! and the canonical time series every fetch resolves to.

pub mod gdelt;
pub mod normalize;

pub use gdelt::{FetchError, GdeltClient};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Kind of timeline requested from the GDELT Doc API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Sentiment over time (`timelinetone`)
    Tone,
    /// Attention volume over time (`timelinevol`)
    Volume,
}

impl Mode {
    /// Returns the value the API expects in its `mode` query parameter
    pub fn as_api_param(&self) -> &'static str {
        match self {
            Mode::Tone => "timelinetone",
            Mode::Volume => "timelinevol",
        }
    }
}

/// Half-open datetime interval `[start, end)` covered by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive start of the interval
    pub start: NaiveDateTime,
    /// Exclusive end of the interval
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Creates a new date range
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Serializes the start endpoint into the API's `STARTDATETIME` format
    pub fn start_param(&self) -> String {
        self.start.format("%Y%m%d%H%M%S").to_string()
    }

    /// Serializes the end endpoint into the API's `ENDDATETIME` format
    pub fn end_param(&self) -> String {
        self.end.format("%Y%m%d%H%M%S").to_string()
    }
}

impl Default for DateRange {
    /// Default analysis window spanning 2017 through 2024
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(NaiveDateTime::MIN);
        let end = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap_or(NaiveDateTime::MAX);
        Self { start, end }
    }
}

/// Identifies one fetch request against the GDELT Doc API
///
/// The `label` doubles as the on-disk cache key. It must be unique per
/// distinct (query, mode) pair used by the caller; the pipeline does not
/// enforce this, so reusing a label for a different query silently aliases
/// the cached payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Free-text search expression, passed through to the API verbatim
    pub query: String,
    /// Which timeline to request
    pub mode: Mode,
    /// Caller-assigned identifier; also the cache key
    pub label: String,
    /// Datetime interval the request covers
    pub date_range: DateRange,
}

impl QueryDescriptor {
    /// Creates a descriptor with the default date range
    pub fn new(query: impl Into<String>, mode: Mode, label: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode,
            label: label.into(),
            date_range: DateRange::default(),
        }
    }

    /// Replaces the date range
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }
}

/// A single `(timestamp, value)` pair in a canonical time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Timestamp parsed from the payload's first column
    pub timestamp: NaiveDateTime,
    /// Finite numeric value
    pub value: f64,
}

/// Canonical single-column time series produced by the fetch pipeline
///
/// Observations keep the order the API returned them in; no ordering or
/// uniqueness invariant is imposed. The empty series is a first-class value:
/// every failure path of the pipeline degrades to it, so callers treat empty
/// and non-empty results uniformly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<Observation>,
}

impl TimeSeries {
    /// Returns the well-defined empty series
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Builds a series from observations, preserving their order
    pub fn from_points(points: Vec<Observation>) -> Self {
        Self { points }
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no observations
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The observations in source order
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// Iterator over the numeric values in source order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_mode_api_params() {
        assert_eq!(Mode::Tone.as_api_param(), "timelinetone");
        assert_eq!(Mode::Volume.as_api_param(), "timelinevol");
    }

    #[test]
    fn test_default_date_range_spans_2017_to_2024() {
        let range = DateRange::default();
        assert_eq!(range.start_param(), "20170101000000");
        assert_eq!(range.end_param(), "20241231235959");
    }

    #[test]
    fn test_date_range_param_format() {
        let range = DateRange::new(ts(2020, 3, 15), ts(2021, 6, 1));
        assert_eq!(range.start_param(), "20200315000000");
        assert_eq!(range.end_param(), "20210601000000");
    }

    #[test]
    fn test_descriptor_defaults_and_override() {
        let desc = QueryDescriptor::new("\"China\" sourcecountry:US", Mode::Tone, "US_Tone");
        assert_eq!(desc.date_range, DateRange::default());

        let custom = DateRange::new(ts(2019, 1, 1), ts(2020, 1, 1));
        let desc = desc.with_date_range(custom);
        assert_eq!(desc.date_range, custom);
        assert_eq!(desc.label, "US_Tone");
    }

    #[test]
    fn test_empty_series_is_well_defined() {
        let series = TimeSeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert_eq!(series, TimeSeries::default());
    }

    #[test]
    fn test_series_preserves_source_order() {
        let series = TimeSeries::from_points(vec![
            Observation { timestamp: ts(2020, 1, 2), value: 2.0 },
            Observation { timestamp: ts(2020, 1, 1), value: 1.0 },
        ]);
        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![2.0, 1.0]);
        assert_eq!(series.points()[0].timestamp, ts(2020, 1, 2));
    }
}
