//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

use crate::models::GroupKey;

/// Ratelens - suicide-rate chart data for external renderers
///
/// Loads the WHO suicide statistics and Human Freedom Index tables,
/// computes a grouped time-series and a rate-vs-freedom scatter with
/// trend line, and exports both as JSON or Markdown.
///
/// Examples:
///   ratelens --who who_suicide_statistics.csv --hfi hfi_cc_2021.csv
///   ratelens --who who.csv --hfi hfi.csv --group country --levels Albania,Austria
///   ratelens --who who.csv --hfi hfi.csv --group sex --start-year 1990 --end-year 2010
///   ratelens --who who.csv --group age --list-levels
///   ratelens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the WHO suicide statistics CSV
    ///
    /// Required columns: country, year, sex, age, suicides_no, population.
    /// Can also be set via RATELENS_WHO or the config file.
    #[arg(long, value_name = "FILE", env = "RATELENS_WHO")]
    pub who: Option<PathBuf>,

    /// Path to the Human Freedom Index CSV
    ///
    /// Required columns: year, countries, hf_score (extra columns are ignored).
    /// Can also be set via RATELENS_HFI or the config file.
    #[arg(long, value_name = "FILE", env = "RATELENS_HFI")]
    pub hfi: Option<PathBuf>,

    /// Grouping dimension for the line chart
    #[arg(short, long, default_value = "none", value_name = "KEY")]
    pub group: GroupKey,

    /// Starting year of the window (inclusive)
    ///
    /// Defaults to the config file value or 1979.
    #[arg(long, value_name = "YEAR")]
    pub start_year: Option<i32>,

    /// Ending year of the window (inclusive)
    ///
    /// Defaults to the config file value or 2016.
    #[arg(long, value_name = "YEAR")]
    pub end_year: Option<i32>,

    /// Levels to activate, comma-separated
    ///
    /// Example: --levels Albania,Austria. Requires a grouping key other
    /// than "none". Defaults to the first level only.
    #[arg(long, value_name = "LEVELS", value_delimiter = ',')]
    pub levels: Option<Vec<String>>,

    /// Year the scatter plot is restricted to
    ///
    /// Defaults to the config file value or 2010.
    #[arg(long, value_name = "YEAR")]
    pub scatter_year: Option<i32>,

    /// Output file path
    ///
    /// Defaults to the config file value or ratelens_export.json.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (json, markdown)
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// List the selectable levels for the chosen grouping and exit
    #[arg(long)]
    pub list_levels: bool,

    /// List the distinct years in the WHO data and exit
    #[arg(long)]
    pub list_years: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ratelens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ratelens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON format (default; renderer-facing)
    #[default]
    Json,
    /// Markdown format (human-readable summary)
    Markdown,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate year window if both bounds were given explicitly
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                return Err(format!(
                    "Start year {} must not be after end year {}",
                    start, end
                ));
            }
        }

        // Levels only make sense with a grouping key
        if self.levels.is_some() && self.group == GroupKey::None {
            return Err("--levels requires a grouping key other than 'none'".to_string());
        }

        if self.list_levels && self.group == GroupKey::None {
            return Err("--list-levels requires a grouping key other than 'none'".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            who: Some(PathBuf::from("who.csv")),
            hfi: Some(PathBuf::from("hfi.csv")),
            group: GroupKey::None,
            start_year: None,
            end_year: None,
            levels: None,
            scatter_year: None,
            output: None,
            format: OutputFormat::Json,
            list_levels: false,
            list_years: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok_by_default() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_inverted_years() {
        let mut args = make_args();
        args.start_year = Some(2010);
        args.end_year = Some(2000);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_levels_need_grouping() {
        let mut args = make_args();
        args.levels = Some(vec!["Albania".to_string()]);
        assert!(args.validate().is_err());

        args.group = GroupKey::Country;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
