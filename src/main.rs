//! Podium - statistics report for a national team athlete dataset
//!
//! A CLI tool that loads the bundled athletes JSON file, derives roster
//! and performance statistics, and writes a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, config, dataset, unknown athlete)

mod analysis;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use report::ReportRequest;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load config before logging so `[general].verbose` can raise the level
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("Podium v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    if let Err(e) = run(args, config) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .podium.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the dataset path, reference year and report options.");
    Ok(())
}

/// Initialize logging at `level`.
fn init_logging(level: tracing::Level) {

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, build the report and write it out.
fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let data_path = config.dataset.path.clone();
    println!("📥 Loading dataset: {}", data_path.display());
    let data = dataset::load_dataset(&data_path)?;
    info!("Loaded {} athletes", data.athletes.len());

    let request = ReportRequest {
        page: args.page,
        athlete: args.athlete.clone(),
        today: args.today.unwrap_or_else(|| Utc::now().date_naive()),
    };

    println!(
        "📊 Computing statistics (reference year {})...",
        config.dataset.reference_year
    );
    let report = report::build_report(&data, &config, &request)?;

    if let Some(ref feed) = report.feed {
        if feed.items.is_empty() && feed.total_items > 0 {
            warn!(
                "Page {} is past the end of the results feed ({} pages)",
                feed.page, feed.total_pages
            );
        }
    }

    let output = Path::new(&config.general.output);
    let written = match args.format {
        OutputFormat::Json => report::generator::write_json_report(&report, output),
        OutputFormat::Markdown => report::generator::write_report(&report, output),
    };
    written.with_context(|| format!("Failed to write report to {}", output.display()))?;

    let stats = &report.statistics;
    println!("\n📋 Summary:");
    println!("   Athletes: {}", stats.total_athletes);
    println!(
        "   - Ski: {} | Snowboard: {} | Other: {}",
        stats.sport_split.ski, stats.sport_split.snowboard, stats.sport_split.other
    );
    println!("   Sports: {}", stats.by_sport.len());
    println!("   Medalists: {}", report.medalists.len());
    println!("   Opening day: {}", report.metadata.countdown);
    println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("\n✅ Report saved to: {}", output.display());

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems are reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {:#}", CONFIG_FILE, e);
            eprintln!("   Using default settings.");
            Ok(Config::default())
        }
    }
}
