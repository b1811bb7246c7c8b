//! Utilization report builder.
//!
//! Loads the enrollment/capacity CSV and the district boundary GeoJSON, runs
//! the transformation pipeline once, and writes the derived tables as JSON
//! artifacts for the presentation layer.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use schoolcap::load::{read_boundaries, read_utilization_csv};
use schoolcap::pipeline;

#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Derive school-building utilization tables and statistics")]
struct Args {
    /// Enrollment/capacity report CSV (optionally .gz)
    #[arg(short, long)]
    records: PathBuf,

    /// District boundary GeoJSON in EPSG:2263
    #[arg(short, long)]
    boundaries: PathBuf,

    /// Directory to write the derived JSON artifacts into
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Building utilization report");
    info!("Records: {}", args.records.display());
    info!("Boundaries: {}", args.boundaries.display());

    let rows = read_utilization_csv(&args.records)?;
    let shapes = read_boundaries(&args.boundaries)?;

    // One synchronous pass; the output is a read-only snapshot.
    let output = pipeline::run(rows, shapes)?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    write_json(&args.out_dir.join("district_table.json"), &output.districts)?;
    write_json(&args.out_dir.join("city_stats.json"), &output.city)?;
    write_json(&args.out_dir.join("district_stats.json"), &output.by_district)?;
    write_json(&args.out_dir.join("boundaries.geojson"), &output.boundaries)?;

    info!(
        "Report written to {}: {} districts, {} buildings",
        args.out_dir.display(),
        output.districts.len(),
        output.buildings.len()
    );

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
