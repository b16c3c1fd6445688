//! Markdown and JSON export generation.
//!
//! This module renders the assembled chart data into the two output
//! formats. The JSON form is the renderer-facing contract; the
//! Markdown form is a readable summary of the same data.

use anyhow::{Context, Result};

use crate::models::{ChartExport, ExportMetadata, ScatterChart, SeriesSet};

/// Serialize the full export as pretty-printed JSON.
pub fn generate_json_report(export: &ChartExport) -> Result<String> {
    serde_json::to_string_pretty(export).context("Failed to serialize chart export to JSON")
}

/// Generate a complete Markdown summary of the export.
pub fn generate_markdown_report(export: &ChartExport) -> String {
    let mut output = String::new();

    output.push_str("# Ratelens Export\n\n");
    output.push_str(&generate_metadata_section(&export.metadata));
    output.push_str(&generate_line_chart_section(
        &export.line_chart,
        &export.levels,
        &export.active_levels,
    ));
    output.push_str(&generate_scatter_section(&export.scatter));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ExportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **WHO Records:** {}\n", metadata.who_rows));
    section.push_str(&format!("- **HFI Records:** {}\n", metadata.hfi_rows));
    section.push_str(&format!("- **Grouping Key:** `{}`\n", metadata.group_key));
    section.push_str(&format!(
        "- **Year Window:** {} - {}\n",
        metadata.year_start, metadata.year_end
    ));
    section.push_str(&format!("- **Scatter Year:** {}\n", metadata.scatter_year));
    section.push('\n');

    section
}

/// Generate the line-chart section with one table per series.
fn generate_line_chart_section(
    chart: &SeriesSet,
    levels: &[String],
    active_levels: &[String],
) -> String {
    let mut section = String::new();

    section.push_str("## Line Chart\n\n");
    section.push_str(&format!("**{}**\n\n", chart.title));

    if !levels.is_empty() {
        section.push_str(&format!(
            "Selectable levels ({}): {}\n\n",
            levels.len(),
            levels.join(", ")
        ));
        section.push_str(&format!("Active: {}\n\n", active_levels.join(", ")));
    }

    if chart.series.is_empty() {
        section.push_str("_No series in the selected window._\n\n");
        return section;
    }

    for (series, color) in chart.series.iter().zip(&chart.colors) {
        section.push_str(&format!("### {} (`{}`)\n\n", series.label, color));
        section.push_str("| Year | Rate |\n");
        section.push_str("|------|------|\n");
        for (year, rate) in series.years.iter().zip(&series.rates) {
            section.push_str(&format!("| {} | {:.4} |\n", year, rate));
        }
        section.push('\n');
    }

    section
}

/// Generate the scatter section with the fit summary.
fn generate_scatter_section(scatter: &ScatterChart) -> String {
    let mut section = String::new();

    section.push_str("## Scatter\n\n");
    section.push_str(&format!("**{}**\n\n", scatter.title));
    section.push_str(&format!(
        "Trend line: rate = {:.4} x hf_score + {:.4} ({} countries)\n\n",
        scatter.trend.slope,
        scatter.trend.intercept,
        scatter.points.len()
    ));

    section.push_str("| Country | HF Score | Rate |\n");
    section.push_str("|---------|----------|------|\n");
    for point in &scatter.points {
        section.push_str(&format!(
            "| {} | {:.2} | {:.4} |\n",
            point.country, point.hf_score, point.rate
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Generated by Ratelens v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}
