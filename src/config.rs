//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.podium.toml` files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".podium.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default. `--quiet` still wins.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "podium_report.md".to_string()
}

/// Dataset location and reference dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the athletes JSON file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Year used as "now" when computing ages.
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,

    /// Opening day of the games, for the countdown.
    #[serde(default = "default_opening_date")]
    pub opening_date: NaiveDate,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            reference_year: default_reference_year(),
            opening_date: default_opening_date(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/athletes.json")
}

fn default_reference_year() -> i32 {
    2026
}

fn default_opening_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 6).unwrap_or_default()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Results per page in the results feed.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Number of athletes in the top rankers table.
    #[serde(default = "default_top_rankers")]
    pub top_rankers: usize,

    /// Include the per-sport roster section.
    #[serde(default = "default_true")]
    pub include_roster: bool,

    /// Include the results feed section.
    #[serde(default = "default_true")]
    pub include_feed: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            top_rankers: default_top_rankers(),
            include_roster: true,
            include_feed: true,
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_top_rankers() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.clone();
        }
        if let Some(year) = args.reference_year {
            self.dataset.reference_year = year;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(page_size) = args.page_size {
            self.report.page_size = page_size;
        }
        if let Some(top) = args.top {
            self.report.top_rankers = top;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset.reference_year, 2026);
        assert_eq!(config.dataset.path, PathBuf::from("data/athletes.json"));
        assert_eq!(
            config.dataset.opening_date,
            NaiveDate::from_ymd_opt(2026, 2, 6).unwrap()
        );
        assert_eq!(config.report.page_size, 10);
        assert_eq!(config.report.top_rankers, 5);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "custom_report.md"
verbose = true

[dataset]
path = "fixtures/team.json"
reference_year = 2030
opening_date = "2030-02-08"

[report]
page_size = 25
include_roster = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "custom_report.md");
        assert!(config.general.verbose);
        assert_eq!(config.dataset.path, PathBuf::from("fixtures/team.json"));
        assert_eq!(config.dataset.reference_year, 2030);
        assert_eq!(
            config.dataset.opening_date,
            NaiveDate::from_ymd_opt(2030, 2, 8).unwrap()
        );
        assert_eq!(config.report.page_size, 25);
        assert!(!config.report.include_roster);
        assert!(config.report.include_feed);
        assert_eq!(config.report.top_rankers, 5);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[dataset]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.dataset.reference_year, 2026);
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "[dataset]\nreference_year = 2022\n",
        )
        .unwrap();
        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.dataset.reference_year, 2022);
    }

    #[test]
    fn test_merge_only_overrides_explicit_args() {
        let mut config = Config::default();
        config.report.page_size = 20;

        let mut args = make_args();
        args.reference_year = Some(2027);
        args.data = Some(PathBuf::from("other.json"));
        config.merge_with_args(&args);

        assert_eq!(config.dataset.reference_year, 2027);
        assert_eq!(config.dataset.path, PathBuf::from("other.json"));
        assert_eq!(config.report.page_size, 20);
        assert_eq!(config.general.output, "podium_report.md");
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_verbose_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "[general]\nverbose = true\n",
        )
        .unwrap();

        let mut config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        let args = make_args();
        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert_eq!(
            args.log_level(config.general.verbose),
            tracing::Level::DEBUG
        );
    }
}
