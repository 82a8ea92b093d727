//! Payload normalization: raw tabular bytes into a canonical time series
//!
//! The upstream API's column naming is mode-dependent and undocumented, so
//! this module works heuristically: the value column is the one headed
//! `Value` when present, otherwise the last column of the table. Rows whose
//! value cell does not parse as a finite number are dropped entirely, as are
//! rows whose first column does not parse as a timestamp. Nothing here
//! errors; every malformed shape degrades to a smaller (possibly empty)
//! series.

use chrono::{NaiveDate, NaiveDateTime};

use super::{Observation, TimeSeries};

/// Header name identifying the numeric column when the API provides one
const VALUE_HEADER: &str = "Value";

/// Timestamp formats accepted for the first column, tried in order
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y%m%d%H%M%S",
    "%Y%m%dT%H%M%SZ",
];

/// Date-only formats accepted for the first column, promoted to midnight
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Normalizes a raw payload into the canonical time series
///
/// # Arguments
/// * `raw` - Payload bytes exactly as returned by the API (or the cache)
///
/// # Returns
/// The cleaned series, or the empty series when no usable rows remain. This
/// function never fails.
pub fn normalize_payload(raw: &[u8]) -> TimeSeries {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(raw);

    let headers = match reader.headers() {
        Ok(headers) if !headers.is_empty() => headers.clone(),
        _ => return TimeSeries::empty(),
    };

    let value_idx = headers
        .iter()
        .position(|h| h.trim() == VALUE_HEADER)
        .unwrap_or(headers.len() - 1);

    // Numeric coercion first: a row survives only with a finite value.
    let mut rows: Vec<(String, f64)> = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        let Some(cell) = record.get(value_idx) else { continue };
        let Ok(value) = cell.trim().parse::<f64>() else { continue };
        if !value.is_finite() {
            continue;
        }
        let Some(time_cell) = record.get(0) else { continue };
        rows.push((time_cell.trim().to_string(), value));
    }

    if rows.is_empty() {
        return TimeSeries::empty();
    }

    let points = rows
        .into_iter()
        .filter_map(|(time_cell, value)| {
            parse_timestamp(&time_cell).map(|timestamp| Observation { timestamp, value })
        })
        .collect();

    TimeSeries::from_points(points)
}

/// Parses a timestamp cell, trying datetime formats first and date-only
/// formats second
pub(crate) fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cell, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
