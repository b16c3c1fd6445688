//! Ratelens - Suicide-Rate Chart Data Exporter
//!
//! A CLI tool that loads the WHO suicide statistics and the Human
//! Freedom Index, computes a grouped/filterable time-series and a
//! rate-vs-freedom scatter with fitted trend line, and exports both
//! in renderer-ready JSON or readable Markdown.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, missing files, chart failure)

mod aggregate;
mod cli;
mod config;
mod controller;
mod error;
mod loader;
mod models;
mod report;
mod scatter;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use controller::{Controller, ControlEvent};
use models::{ChartExport, ExportMetadata};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging(&args);

    info!("Ratelens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_export(args) {
        error!("Export failed: {}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .ratelens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".ratelens.toml");

    if path.exists() {
        eprintln!("⚠️  .ratelens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .ratelens.toml")?;

    println!("✅ Created .ratelens.toml with default settings.");
    println!("   Edit it to customize data paths and year bounds.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete export workflow.
fn run_export(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Load the WHO table
    let who_path = Path::new(&config.data.who_path);
    let records = loader::load_who(who_path)?;
    let who_rows = records.len();

    // Handle --list-years: print the distinct years and exit
    if args.list_years {
        for year in aggregate::distinct_years(&records) {
            println!("{}", year);
        }
        return Ok(());
    }

    // Handle --list-levels: print the selectable levels and exit
    if args.list_levels {
        let rows = aggregate::aggregate(&records, args.group);
        for level in controller::levels_of(&rows) {
            println!("{}", level);
        }
        return Ok(());
    }

    // Step 2: Load the HFI table and build the scatter
    let hfi_path = Path::new(&config.data.hfi_path);
    let freedom = loader::load_hfi(hfi_path)?;
    let hfi_rows = freedom.len();

    let scatter = scatter::build_scatter(&records, &freedom, config.chart.scatter_year)?;

    // Step 3: Build the controller with the initial selection
    let mut controller = Controller::new(
        records,
        args.group,
        config.chart.start_year,
        config.chart.end_year,
    )?;

    // Step 4: Activate the requested levels (default: first level only)
    if let Some(ref requested) = args.levels {
        let indices = resolve_levels(&controller, requested)?;
        controller.on_control_changed(ControlEvent::ActiveLevelsChanged(indices))?;
    }

    let active_levels: Vec<String> = controller
        .active()
        .iter()
        .filter_map(|&i| controller.levels().get(i).cloned())
        .collect();

    // Step 5: Assemble and write the export
    let export = ChartExport {
        metadata: ExportMetadata {
            generated_at: Utc::now(),
            who_rows,
            hfi_rows,
            group_key: controller.group_key(),
            year_start: config.chart.start_year,
            year_end: config.chart.end_year,
            scatter_year: config.chart.scatter_year,
        },
        line_chart: controller.series_set().clone(),
        levels: controller.levels().to_vec(),
        active_levels,
        scatter,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&export)?,
        OutputFormat::Markdown => report::generate_markdown_report(&export),
    };

    let output_path = &config.general.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write export to {}", output_path))?;

    // Print summary
    println!("\n📊 Export Summary:");
    println!("   Line chart: {}", export.line_chart.title);
    println!(
        "   Series: {} | Points: {}",
        export.line_chart.series.len(),
        export.line_chart.point_count()
    );
    println!(
        "   Scatter: {} countries in {} (slope {:.4})",
        export.scatter.points.len(),
        export.scatter.year,
        export.scatter.trend.slope
    );
    println!("\n✅ Export complete! Saved to: {}", output_path);

    Ok(())
}

/// Map requested level names to indices in the controller's level list.
///
/// Unknown names are skipped with a warning; an entirely unknown list
/// is an error rather than an empty chart.
fn resolve_levels(controller: &Controller, requested: &[String]) -> Result<Vec<usize>> {
    let mut indices = Vec::new();

    for name in requested {
        match controller.levels().iter().position(|l| l == name) {
            Some(i) => indices.push(i),
            None => warn!("Unknown level {:?}, skipping", name),
        }
    }

    if indices.is_empty() {
        anyhow::bail!(
            "None of the requested levels exist for grouping key '{}'",
            controller.group_key()
        );
    }

    Ok(indices)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .ratelens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
