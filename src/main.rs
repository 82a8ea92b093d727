//! Mediatone - compare media sentiment and attention volume across countries
//!
//! Batch driver: fetches tone and volume timelines for each configured
//! country and theme, then prints sparkline comparisons, a yearly sentiment
//! matrix, an attention-vs-tone correlation, a thematic comparison, and a
//! final descriptive-statistics table. A failed sub-query degrades to an
//! empty series and never aborts the run.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mediatone::analysis;
use mediatone::cli::{Cli, RunConfig};
use mediatone::data::{GdeltClient, Mode, QueryDescriptor, TimeSeries};
use mediatone::report;

/// Sparkline width for the terminal comparisons
const CHART_WIDTH: usize = 60;

/// Builds the descriptor for one country timeline
fn country_descriptor(run: &RunConfig, country: &str, mode: Mode) -> QueryDescriptor {
    let suffix = match mode {
        Mode::Tone => "Tone",
        Mode::Volume => "Vol",
    };
    QueryDescriptor::new(
        format!("\"{}\" sourcecountry:{}", run.topic, country),
        mode,
        format!("{}_{}", country, suffix),
    )
    .with_date_range(run.app.date_range)
}

/// Builds the descriptor for one theme timeline within a country
fn theme_descriptor(run: &RunConfig, country: &str, theme: &str) -> QueryDescriptor {
    QueryDescriptor::new(
        format!("\"{}\" \"{}\" sourcecountry:{}", run.topic, theme, country),
        Mode::Tone,
        format!("{}_{}", country, theme),
    )
    .with_date_range(run.app.date_range)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let run = RunConfig::from_cli(&cli)?;
    let client = GdeltClient::new(&run.app)?;

    info!(topic = %run.topic, countries = ?run.countries, "starting analysis");

    // Collector for the final statistics table
    let mut all_series: Vec<(String, TimeSeries)> = Vec::new();

    // Phase 1: sentiment per country
    let mut tone_series: Vec<(String, TimeSeries)> = Vec::new();
    for country in &run.countries {
        let series = client.fetch(&country_descriptor(&run, country, Mode::Tone)).await;
        all_series.push((format!("{} Sentiment", country), series.clone()));
        tone_series.push((country.clone(), series));
    }

    println!("\nSentiment comparison (30-sample smoothing)");
    print!("{}", report::series_comparison(&tone_series, CHART_WIDTH));

    // Phase 2: attention volume for the first two countries
    let mut volume_series: Vec<(String, TimeSeries)> = Vec::new();
    for country in run.countries.iter().take(2) {
        let series = client.fetch(&country_descriptor(&run, country, Mode::Volume)).await;
        all_series.push((format!("{} Volume", country), series.clone()));
        volume_series.push((country.clone(), series));
    }

    println!("\nAttention volume comparison");
    print!("{}", report::series_comparison(&volume_series, CHART_WIDTH));

    // Phase 3: yearly average sentiment matrix
    println!("\nYearly average sentiment");
    print!("{}", report::yearly_matrix(&tone_series));

    // Phase 4: attention vs. sentiment for the lead country
    if let (Some((lead, lead_tone)), Some((_, lead_volume))) =
        (tone_series.first(), volume_series.first())
    {
        match analysis::monthly_correlation(lead_volume, lead_tone) {
            Some(r) => println!("\nAttention vs. sentiment ({}): R = {:.2}", lead, r),
            None => println!("\nAttention vs. sentiment ({}): insufficient data", lead),
        }
    }

    // Phase 5: thematic comparison between the first and last country
    if let (Some(first), Some(last)) = (run.countries.first(), run.countries.last()) {
        if first != last {
            let mut first_themes = Vec::new();
            let mut last_themes = Vec::new();
            for theme in &run.themes {
                let f = client.fetch(&theme_descriptor(&run, first, theme)).await;
                let l = client.fetch(&theme_descriptor(&run, last, theme)).await;
                all_series.push((format!("Theme: {} {}", first, theme), f.clone()));
                all_series.push((format!("Theme: {} {}", last, theme), l.clone()));
                first_themes.push(f);
                last_themes.push(l);
            }

            println!("\nThematic divergence (mean tone)");
            print!(
                "{}",
                report::theme_comparison(&run.themes, first, &first_themes, last, &last_themes)
            );
        }
    }

    // Final: descriptive statistics over everything fetched
    println!("\nDescriptive statistics");
    print!("{}", report::stats_table(&analysis::summarize(&all_series)));

    Ok(())
}
