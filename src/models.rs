//! Data models for the rate explorer.
//!
//! This module contains all the core data structures used throughout
//! the application for representing records, aggregated rows, and
//! chart-ready series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;

/// Multiplier applied to count/population ratios: rates are expressed
/// as suicides per 10,000 people.
pub const RATE_SCALE: f64 = 10_000.0;

/// The categorical dimension used to partition records before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    /// Group by country.
    Country,
    /// Group by sex.
    Sex,
    /// Group by age bracket.
    Age,
    /// No grouping: one row per year across all records.
    None,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Country => write!(f, "country"),
            GroupKey::Sex => write!(f, "sex"),
            GroupKey::Age => write!(f, "age"),
            GroupKey::None => write!(f, "none"),
        }
    }
}

impl FromStr for GroupKey {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "country" => Ok(GroupKey::Country),
            "sex" => Ok(GroupKey::Sex),
            "age" => Ok(GroupKey::Age),
            "none" => Ok(GroupKey::None),
            other => Err(ChartError::InvalidGroupKey(other.to_string())),
        }
    }
}

/// One observational row from the WHO suicide statistics table.
///
/// Numeric fields are zero-filled by the loader; the core never sees
/// a missing count or population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Country name.
    pub country: String,
    /// Observation year.
    pub year: i32,
    /// Sex category.
    pub sex: String,
    /// Age bracket (e.g. "15-24 years").
    pub age: String,
    /// Number of suicides (zero-filled when missing).
    pub suicides_no: f64,
    /// Population of the cohort (zero-filled when missing).
    pub population: f64,
}

impl Record {
    /// Returns the value of the given grouping dimension for this record.
    ///
    /// `GroupKey::None` has no level value.
    pub fn level(&self, key: GroupKey) -> Option<&str> {
        match key {
            GroupKey::Country => Some(&self.country),
            GroupKey::Sex => Some(&self.sex),
            GroupKey::Age => Some(&self.age),
            GroupKey::None => None,
        }
    }
}

/// One row from the Human Freedom Index table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreedomRecord {
    /// Observation year.
    pub year: i32,
    /// Country name (the HFI table calls this column `countries`).
    pub country: String,
    /// Human freedom score on a 0-10 scale, absent for unscored rows.
    pub hf_score: Option<f64>,
}

/// One aggregated row: sums over all records sharing (key value, year),
/// or just (year) when ungrouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    /// Value of the grouping dimension, `None` when ungrouped.
    pub key: Option<String>,
    /// Observation year.
    pub year: i32,
    /// Summed suicide count.
    pub suicides_no: f64,
    /// Summed population.
    pub population: f64,
    /// Suicides per 10,000 people; 0 when population is 0.
    pub rate: f64,
}

/// One plotted line: a label and parallel year/rate coordinate lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend label (a level value, or "suicide_rate" when ungrouped).
    pub label: String,
    /// X coordinates, sorted ascending.
    pub years: Vec<i32>,
    /// Y coordinates, parallel to `years`.
    pub rates: Vec<f64>,
}

/// The complete data for one line-chart render: all series, their
/// colors, and the title. Rebuilt in full on every recomputation,
/// never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    /// Chart title reflecting the grouping key and year bounds.
    pub title: String,
    /// One entry per active level.
    pub series: Vec<Series>,
    /// Hex color per series; always the same length as `series`.
    pub colors: Vec<String>,
}

impl SeriesSet {
    /// Total number of plotted points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.years.len()).sum()
    }
}

/// One point of the rate-vs-freedom scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Country the point belongs to.
    pub country: String,
    /// Human freedom score (x).
    pub hf_score: f64,
    /// Suicide rate (y).
    pub rate: f64,
}

/// Least-squares trend line over the scatter points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
    /// `(hf_score, slope * hf_score + intercept)` for every retained point.
    pub fitted: Vec<(f64, f64)>,
}

/// The complete data for the static scatter render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    /// The single year the scatter is restricted to.
    pub year: i32,
    /// Chart title.
    pub title: String,
    /// One point per country with both a rate and a freedom score.
    pub points: Vec<ScatterPoint>,
    /// The fitted trend line.
    pub trend: TrendLine,
}

/// Metadata about one chart-data export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Date and time the export was produced.
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Number of WHO records loaded.
    pub who_rows: usize,
    /// Number of HFI records loaded.
    pub hfi_rows: usize,
    /// Grouping key the line chart was computed under.
    pub group_key: GroupKey,
    /// Inclusive start of the year window.
    pub year_start: i32,
    /// Inclusive end of the year window.
    pub year_end: i32,
    /// Year the scatter is restricted to.
    pub scatter_year: i32,
}

/// Everything an external renderer needs for one session: both charts,
/// the selectable level list, and export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartExport {
    /// Metadata about the export.
    pub metadata: ExportMetadata,
    /// The line-chart series set.
    pub line_chart: SeriesSet,
    /// Full selectable level list for the chosen grouping key.
    pub levels: Vec<String>,
    /// Labels of the levels currently checked.
    pub active_levels: Vec<String>,
    /// The scatter chart with its trend line.
    pub scatter: ScatterChart,
}
