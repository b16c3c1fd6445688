//! CSV ingestion for the two source tables.
//!
//! Loads the WHO suicide statistics table and the Human Freedom Index
//! table into memory. Missing numeric count/population cells are filled
//! with zero here, so the aggregation core never sees a null.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{FreedomRecord, Record};

/// Raw WHO row as it appears on disk; numeric cells may be empty.
#[derive(Debug, Deserialize)]
struct WhoRow {
    country: String,
    year: i32,
    sex: String,
    age: String,
    suicides_no: Option<f64>,
    population: Option<f64>,
}

/// Raw HFI row; only the three columns the scatter needs. The HFI file
/// carries dozens of other columns, which are ignored.
#[derive(Debug, Deserialize)]
struct HfiRow {
    year: i32,
    countries: String,
    hf_score: Option<String>,
}

/// Load the WHO suicide statistics table.
///
/// Empty `suicides_no`/`population` cells become 0.0 (the original
/// data has population gaps for small countries and early years).
pub fn load_who(path: &Path) -> Result<Vec<Record>> {
    info!("Loading WHO suicide statistics from {}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open WHO data file: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: WhoRow = row
            .with_context(|| format!("Malformed WHO row in {}", path.display()))?;
        records.push(Record {
            country: row.country,
            year: row.year,
            sex: row.sex,
            age: row.age,
            suicides_no: row.suicides_no.unwrap_or(0.0),
            population: row.population.unwrap_or(0.0),
        });
    }

    debug!("Loaded {} WHO records", records.len());
    Ok(records)
}

/// Load the Human Freedom Index table.
///
/// Keeps only year, country, and hf_score. Scores that are absent or
/// non-numeric (the HFI file marks unscored cells with "-") stay `None`
/// and are dropped later by the scatter join.
pub fn load_hfi(path: &Path) -> Result<Vec<FreedomRecord>> {
    info!("Loading Human Freedom Index from {}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open HFI data file: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: HfiRow = row
            .with_context(|| format!("Malformed HFI row in {}", path.display()))?;
        let hf_score = row
            .hf_score
            .and_then(|s| s.trim().parse::<f64>().ok());
        records.push(FreedomRecord {
            year: row.year,
            country: row.countries,
            hf_score,
        });
    }

    debug!("Loaded {} HFI records", records.len());
    Ok(records)
}
