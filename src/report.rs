//! Terminal rendering of statistics tables and series comparisons
//!
//! Everything here renders to `String` so the batch driver decides where the
//! output goes and tests can assert on the rendered text. Empty series are
//! skipped, never errors.

use crate::analysis::{self, SeriesStats};
use crate::data::TimeSeries;

/// Block characters for an 8-level sparkline
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Smoothing window applied before sparkline comparisons
const SMOOTHING_WINDOW: usize = 30;

/// Renders the descriptive statistics table
///
/// One row per non-empty series: `Metric | Mean | Std Dev | Min | Max`.
pub fn stats_table(summary: &[(String, SeriesStats)]) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(65));
    out.push('\n');
    out.push_str(&format!(
        "{:<20} | {:<8} | {:<8} | {:<8} | {:<8}\n",
        "Metric", "Mean", "Std Dev", "Min", "Max"
    ));
    out.push_str(&"-".repeat(65));
    out.push('\n');

    for (name, stats) in summary {
        out.push_str(&format!(
            "{:<20} | {:<8.4} | {:<8.4} | {:<8.4} | {:<8.4}\n",
            name, stats.mean, stats.std_dev, stats.min, stats.max
        ));
    }

    out.push_str(&"=".repeat(65));
    out.push('\n');
    out
}

/// Maps a slice of values onto an 8-level block sparkline
///
/// Values are normalized against their own min/max; a constant series
/// renders as a line of middle blocks. Longer slices are bucketed down to
/// `width` by averaging.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let bucketed = bucket_means(values, width);

    let min = bucketed.iter().copied().fold(f64::INFINITY, f64::min);
    let max = bucketed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    bucketed
        .iter()
        .map(|&v| {
            if span == 0.0 {
                BLOCKS[3]
            } else {
                let normalized = ((v - min) / span).clamp(0.0, 1.0);
                let index = ((normalized * 7.0).round() as usize).min(7);
                BLOCKS[index]
            }
        })
        .collect()
}

/// Averages values into at most `width` buckets, preserving order
fn bucket_means(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }
    (0..width)
        .map(|i| {
            let start = i * values.len() / width;
            let end = ((i + 1) * values.len() / width).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Renders one smoothed sparkline row per non-empty series
pub fn series_comparison(named: &[(String, TimeSeries)], width: usize) -> String {
    let mut out = String::new();
    for (name, series) in named {
        if series.is_empty() {
            continue;
        }
        let smoothed = analysis::rolling_mean(series, SMOOTHING_WINDOW);
        let values: Vec<f64> = smoothed.values().collect();
        out.push_str(&format!("{:<20} {}\n", name, sparkline(&values, width)));
    }
    out
}

/// Renders the yearly-mean matrix: one row per series, one column per year
pub fn yearly_matrix(named: &[(String, TimeSeries)]) -> String {
    let per_series: Vec<(&str, Vec<(i32, f64)>)> = named
        .iter()
        .filter(|(_, s)| !s.is_empty())
        .map(|(name, s)| (name.as_str(), analysis::yearly_mean(s)))
        .collect();

    let mut years: Vec<i32> = per_series
        .iter()
        .flat_map(|(_, yearly)| yearly.iter().map(|(y, _)| *y))
        .collect();
    years.sort_unstable();
    years.dedup();

    if years.is_empty() {
        return String::new();
    }

    let mut out = format!("{:<12}", "");
    for year in &years {
        out.push_str(&format!("{:>8}", year));
    }
    out.push('\n');

    for (name, yearly) in &per_series {
        out.push_str(&format!("{:<12}", name));
        for year in &years {
            match yearly.iter().find(|(y, _)| y == year) {
                Some((_, mean)) => out.push_str(&format!("{:>8.2}", mean)),
                None => out.push_str(&format!("{:>8}", "-")),
            }
        }
        out.push('\n');
    }
    out
}

/// Renders per-theme mean tone for two sources side by side
///
/// Empty series contribute a 0.0 mean, matching the reference radar chart
/// input.
pub fn theme_comparison(
    themes: &[String],
    left_name: &str,
    left: &[TimeSeries],
    right_name: &str,
    right: &[TimeSeries],
) -> String {
    let mut out = format!("{:<12} | {:>10} | {:>10}\n", "Theme", left_name, right_name);
    out.push_str(&"-".repeat(40));
    out.push('\n');

    for (i, theme) in themes.iter().enumerate() {
        let left_mean = series_mean_or_zero(left.get(i));
        let right_mean = series_mean_or_zero(right.get(i));
        out.push_str(&format!("{:<12} | {:>10.4} | {:>10.4}\n", theme, left_mean, right_mean));
    }
    out
}

fn series_mean_or_zero(series: Option<&TimeSeries>) -> f64 {
    series
        .and_then(SeriesStats::from_series)
        .map(|stats| stats.mean)
        .unwrap_or(0.0)
}
