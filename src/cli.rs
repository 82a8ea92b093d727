//! Command-line interface parsing for Mediatone
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the run configuration the batch driver consumes, including date
//! range overrides in the API's compact datetime format.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;
use thiserror::Error;

use crate::config::AppConfig;
use crate::data::DateRange;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A date argument did not match an accepted format
    #[error("Invalid datetime: '{0}'. Expected YYYYMMDD or YYYYMMDDHHMMSS")]
    InvalidDateTime(String),

    /// The configured range is empty or inverted
    #[error("Date range start must precede end")]
    EmptyDateRange,
}

/// Mediatone - compare media sentiment and attention across countries
#[derive(Parser, Debug)]
#[command(name = "mediatone")]
#[command(about = "Media sentiment and attention-volume comparison via the GDELT Doc API")]
#[command(version)]
pub struct Cli {
    /// Topic searched for, quoted verbatim in every query
    #[arg(long, default_value = "China")]
    pub topic: String,

    /// Source countries (FIPS codes) compared in the tone and volume phases
    #[arg(long, value_delimiter = ',', default_value = "US,UK,NG,JA,IN,RS")]
    pub countries: Vec<String>,

    /// Themes compared in the thematic phase
    #[arg(long, value_delimiter = ',', default_value = "Trade,Military,Culture,Tech")]
    pub themes: Vec<String>,

    /// Cache directory override
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Start of the date range (YYYYMMDD or YYYYMMDDHHMMSS)
    #[arg(long, value_name = "DATETIME")]
    pub start: Option<String>,

    /// End of the date range (YYYYMMDD or YYYYMMDDHHMMSS)
    #[arg(long, value_name = "DATETIME")]
    pub end: Option<String>,

    /// Per-request network timeout in seconds
    #[arg(long, default_value_t = 45)]
    pub timeout_secs: u64,
}

/// Configuration derived from CLI arguments for one batch run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Pipeline and cache configuration
    pub app: AppConfig,
    /// Topic searched for
    pub topic: String,
    /// Countries compared
    pub countries: Vec<String>,
    /// Themes compared
    pub themes: Vec<String>,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with defaults applied where arguments are absent
    /// * `Err(CliError)` if a date argument is malformed or the range is empty
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut app = AppConfig::default()
            .with_request_timeout(std::time::Duration::from_secs(cli.timeout_secs));

        if let Some(dir) = &cli.cache_dir {
            app = app.with_cache_dir(dir.clone());
        }

        let default_range = DateRange::default();
        let start = match &cli.start {
            Some(s) => parse_datetime_arg(s)?,
            None => default_range.start,
        };
        let end = match &cli.end {
            Some(s) => parse_datetime_arg(s)?,
            None => default_range.end,
        };
        if start >= end {
            return Err(CliError::EmptyDateRange);
        }
        app = app.with_date_range(DateRange::new(start, end));

        Ok(Self {
            app,
            topic: cli.topic.clone(),
            countries: cli.countries.clone(),
            themes: cli.themes.clone(),
        })
    }
}

/// Parses a datetime argument in compact API form
///
/// Accepts `YYYYMMDDHHMMSS` or `YYYYMMDD` (promoted to midnight).
pub fn parse_datetime_arg(s: &str) -> Result<NaiveDateTime, CliError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y%m%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(CliError::InvalidDateTime(s.to_string()))
}
