//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Podium - statistics report for a national team athlete dataset
///
/// Reads the bundled athletes JSON file, derives roster and performance
/// statistics, and writes a Markdown or JSON report.
///
/// Examples:
///   podium --data data/athletes.json
///   podium --data data/athletes.json --format json --output stats.json
///   podium --athlete 9531234 --reference-year 2026
///   podium --page 2 --page-size 20
///   podium --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the athletes JSON dataset
    ///
    /// Defaults to the `[dataset].path` config value (data/athletes.json).
    #[arg(short, long, value_name = "FILE", env = "PODIUM_DATA")]
    pub data: Option<PathBuf>,

    /// Year treated as the current year for age calculations
    #[arg(long, value_name = "YEAR")]
    pub reference_year: Option<i32>,

    /// Date treated as today for the opening countdown (YYYY-MM-DD)
    ///
    /// Defaults to the current UTC date.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .podium.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include the profile of one athlete (id or FIS code)
    #[arg(short, long, value_name = "ID")]
    pub athlete: Option<String>,

    /// Results feed page to render (1-based)
    #[arg(long, default_value = "1", value_name = "PAGE")]
    pub page: usize,

    /// Results per feed page
    #[arg(long, value_name = "COUNT")]
    pub page_size: Option<usize>,

    /// Number of athletes in the top rankers table
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .podium.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.page == 0 {
            return Err("Page must be at least 1".to_string());
        }

        if self.page_size == Some(0) {
            return Err("Page size must be at least 1".to_string());
        }

        if let Some(year) = self.reference_year {
            if !(1900..=2200).contains(&year) {
                return Err(format!("Reference year out of range: {}", year));
            }
        }

        if let Some(ref data) = self.data {
            if !data.is_file() {
                return Err(format!("Dataset file does not exist: {}", data.display()));
            }
        }

        if matches!(self.athlete.as_deref(), Some(id) if id.trim().is_empty()) {
            return Err("Athlete id must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from `[general].verbose`; `--quiet` wins
    /// over it.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
