//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ratelens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Source data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Chart selection settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
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
    "ratelens_export.json".to_string()
}

/// Source table locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the WHO suicide statistics CSV.
    #[serde(default = "default_who_path")]
    pub who_path: String,

    /// Path to the Human Freedom Index CSV.
    #[serde(default = "default_hfi_path")]
    pub hfi_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            who_path: default_who_path(),
            hfi_path: default_hfi_path(),
        }
    }
}

fn default_who_path() -> String {
    "who_suicide_statistics.csv".to_string()
}

fn default_hfi_path() -> String {
    "hfi_cc_2021.csv".to_string()
}

/// Default chart selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Inclusive start of the year window.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Inclusive end of the year window.
    #[serde(default = "default_end_year")]
    pub end_year: i32,

    /// Year the scatter plot is restricted to.
    #[serde(default = "default_scatter_year")]
    pub scatter_year: i32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
            scatter_year: default_scatter_year(),
        }
    }
}

fn default_start_year() -> i32 {
    1979
}

fn default_end_year() -> i32 {
    2016
}

fn default_scatter_year() -> i32 {
    2010
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
        let default_path = Path::new(".ratelens.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref who) = args.who {
            self.data.who_path = who.display().to_string();
        }
        if let Some(ref hfi) = args.hfi {
            self.data.hfi_path = hfi.display().to_string();
        }

        if let Some(start) = args.start_year {
            self.chart.start_year = start;
        }
        if let Some(end) = args.end_year {
            self.chart.end_year = end;
        }
        if let Some(year) = args.scatter_year {
            self.chart.scatter_year = year;
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        // Flags always override
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
