//! Descriptive statistics and resampling over canonical time series
//!
//! Pure functions consumed by the report layer. Empty series are always
//! skipped rather than erroring.

use std::collections::BTreeMap;

use crate::data::{Observation, TimeSeries};
use chrono::Datelike;

/// Descriptive statistics for one non-empty series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl SeriesStats {
    /// Computes statistics over a series, or `None` for the empty series
    pub fn from_series(series: &TimeSeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let count = series.len();
        let mean = series.values().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let sum_sq: f64 = series.values().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = series.values().fold(f64::INFINITY, f64::min);
        let max = series.values().fold(f64::NEG_INFINITY, f64::max);

        Some(Self { mean, std_dev, min, max, count })
    }
}

/// Computes statistics for each named series, skipping empty ones
pub fn summarize(series: &[(String, TimeSeries)]) -> Vec<(String, SeriesStats)> {
    series
        .iter()
        .filter_map(|(name, s)| SeriesStats::from_series(s).map(|stats| (name.clone(), stats)))
        .collect()
}

/// Mean value per calendar month, in chronological order
pub fn monthly_mean(series: &TimeSeries) -> Vec<((i32, u32), f64)> {
    group_mean(series, |obs| (obs.timestamp.year(), obs.timestamp.month()))
}

/// Mean value per calendar year, in chronological order
pub fn yearly_mean(series: &TimeSeries) -> Vec<(i32, f64)> {
    group_mean(series, |obs| obs.timestamp.year())
}

fn group_mean<K: Ord + Copy>(series: &TimeSeries, key: impl Fn(&Observation) -> K) -> Vec<(K, f64)> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for obs in series.points() {
        let entry = groups.entry(key(obs)).or_insert((0.0, 0));
        entry.0 += obs.value;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Trailing moving average with a minimum window of one observation
///
/// Mirrors the smoothing the reference figures apply before plotting: each
/// point becomes the mean of up to `window` preceding observations.
pub fn rolling_mean(series: &TimeSeries, window: usize) -> TimeSeries {
    if window == 0 {
        return series.clone();
    }
    let points = series.points();
    let smoothed = points
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let start = i.saturating_sub(window - 1);
            let slice = &points[start..=i];
            let mean = slice.iter().map(|o| o.value).sum::<f64>() / slice.len() as f64;
            Observation { timestamp: obs.timestamp, value: mean }
        })
        .collect();
    TimeSeries::from_points(smoothed)
}

/// Pearson correlation between two series after monthly resampling
///
/// Both series are reduced to monthly means and aligned on their common
/// months. Returns `None` when fewer than two common months exist or either
/// side has zero variance.
pub fn monthly_correlation(a: &TimeSeries, b: &TimeSeries) -> Option<f64> {
    let a_monthly: BTreeMap<(i32, u32), f64> = monthly_mean(a).into_iter().collect();
    let b_monthly: BTreeMap<(i32, u32), f64> = monthly_mean(b).into_iter().collect();

    let paired: Vec<(f64, f64)> = a_monthly
        .iter()
        .filter_map(|(month, &x)| b_monthly.get(month).map(|&y| (x, y)))
        .collect();

    if paired.len() < 2 {
        return None;
    }

    let n = paired.len() as f64;
    let mean_x = paired.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = paired.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &paired {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}
