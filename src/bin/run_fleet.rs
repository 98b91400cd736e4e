//! Compute depreciation schedules for a whole fleet register
//!
//! Reads the register CSV, generates every schedule in parallel, stores each
//! one through the in-memory gateway and writes all rows to a single CSV.
//! Rows that fail validation are reported and skipped.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Instant;

use fleet_depreciation::asset::load_assets;
use fleet_depreciation::persistence::{InMemoryGateway, ScheduleGateway};
use fleet_depreciation::{EngineConfig, ScheduleEngine};

#[derive(Debug, Parser)]
#[command(name = "run_fleet", about = "Batch depreciation schedules for a fleet register")]
struct Args {
    /// Fleet register CSV
    #[arg(default_value = "fleet_register.csv")]
    register: PathBuf,

    /// Output CSV with one row per asset period
    #[arg(long, default_value = "fleet_schedule_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let assets = load_assets(&args.register)
        .with_context(|| format!("failed to load {}", args.register.display()))?;
    info!("loaded {} assets in {:?}", assets.len(), start.elapsed());

    let config = EngineConfig::from_env()?;
    let engine = ScheduleEngine::new(config);

    let proj_start = Instant::now();
    let results = engine.generate_batch(&assets);
    info!("schedules computed in {:?}", proj_start.elapsed());

    let mut gateway = InMemoryGateway::new();
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("unable to create {}", args.output.display()))?;

    let mut failed = 0usize;
    let mut clamped = 0usize;
    let mut total_depreciation = Decimal::ZERO;

    for (idx, (raw, result)) in assets.iter().zip(results).enumerate() {
        let asset_id = raw
            .asset_id
            .clone()
            .unwrap_or_else(|| format!("row-{}", idx + 1));

        let schedule = match result {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!("asset {}: {}", asset_id, e);
                failed += 1;
                continue;
            }
        };

        if !schedule.warnings().is_empty() {
            clamped += 1;
        }
        total_depreciation += schedule.summary().total_depreciation;

        for mut row in schedule.to_rows() {
            row.asset_id = asset_id.clone();
            writer.serialize(row)?;
        }
        gateway.create(&asset_id, schedule)?;
    }
    writer.flush()?;

    println!("Assets:              {}", assets.len());
    println!("Schedules stored:    {}", gateway.len());
    println!("Rejected:            {}", failed);
    println!("With clamped values: {}", clamped);
    println!("Total depreciation:  {:.2}", total_depreciation);
    println!("Output written to:   {}", args.output.display());
    println!("Elapsed:             {:?}", start.elapsed());

    Ok(())
}
