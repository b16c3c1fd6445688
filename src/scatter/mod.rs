//! Rate-vs-freedom scatter data with a fitted trend line.
//!
//! Groups the WHO data by (country, year), joins the Human Freedom
//! Index score on (country, year), restricts to a single year, and fits
//! a linear least-squares trend through the surviving points.

use std::collections::HashMap;

use tracing::debug;

use crate::aggregate::aggregate;
use crate::error::ChartError;
use crate::models::{FreedomRecord, GroupKey, Record, ScatterChart, ScatterPoint, TrendLine};

/// Build the scatter chart for one year.
///
/// Countries without a freedom score for that year are dropped (left
/// join then drop-nulls, as the source analysis does). Fails with
/// `InsufficientData` when fewer than two distinct freedom scores
/// remain, since no line can be fitted.
pub fn build_scatter(
    records: &[Record],
    freedom: &[FreedomRecord],
    year: i32,
) -> Result<ScatterChart, ChartError> {
    let scores: HashMap<&str, f64> = freedom
        .iter()
        .filter(|f| f.year == year)
        .filter_map(|f| f.hf_score.map(|score| (f.country.as_str(), score)))
        .collect();

    let mut points: Vec<ScatterPoint> = aggregate(records, GroupKey::Country)
        .into_iter()
        .filter(|row| row.year == year)
        .filter_map(|row| {
            let country = row.key?;
            let hf_score = *scores.get(country.as_str())?;
            Some(ScatterPoint {
                country,
                hf_score,
                rate: row.rate,
            })
        })
        .collect();
    points.sort_by(|a, b| a.country.cmp(&b.country));

    debug!(
        "Scatter join for {}: {} countries with both rate and score",
        year,
        points.len()
    );

    let xs: Vec<f64> = points.iter().map(|p| p.hf_score).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.rate).collect();
    let (slope, intercept) = linear_fit(&xs, &ys)?;

    let fitted = xs
        .iter()
        .map(|&x| (x, slope * x + intercept))
        .collect();

    Ok(ScatterChart {
        year,
        title: "International Suicide Rate vs. Human Freedom Index".to_string(),
        points,
        trend: TrendLine {
            slope,
            intercept,
            fitted,
        },
    })
}

/// Closed-form least-squares fit of `y = slope * x + intercept`.
///
/// Requires at least two points with distinct x values; a degenerate
/// x column has no defined slope.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Result<(f64, f64), ChartError> {
    let n = xs.len() as f64;
    if xs.len() < 2 {
        return Err(ChartError::InsufficientData(format!(
            "{} point(s), need at least 2",
            xs.len()
        )));
    }

    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return Err(ChartError::InsufficientData(
            "all x values identical".to_string(),
        ));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    Ok((slope, intercept))
}
