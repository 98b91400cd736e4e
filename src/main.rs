//! Fleet Depreciation CLI
//!
//! Computes the depreciation schedule for a single asset and prints it.
//! Engine settings come from DEPRECIATION_* environment variables and can be
//! overridden with flags.

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

use fleet_depreciation::{
    ClampingPolicy, EngineConfig, MethodKind, RawAsset, RoundingPolicy, Schedule, ScheduleEngine,
};

#[derive(Debug, Parser)]
#[command(name = "fleet_depreciation", version, about = "Compute an asset depreciation schedule")]
struct Cli {
    /// Asset identifier (informational)
    #[arg(long)]
    asset_id: Option<String>,

    /// Acquisition cost
    #[arg(long)]
    cost: Option<Decimal>,

    /// Purchase date (YYYY-MM-DD, DD/MM/YYYY or YYYY/MM/DD)
    #[arg(long)]
    purchase_date: Option<String>,

    /// Useful life in years
    #[arg(long)]
    life: Option<i64>,

    /// Residual value floor
    #[arg(long)]
    residual: Option<Decimal>,

    /// Explicit method: straight_line, declining_coefficient or hourly_usage
    #[arg(long)]
    method: Option<MethodKind>,

    /// Free-text method label, used when --method is not given
    #[arg(long)]
    label: Option<String>,

    /// Declining coefficient in (0, 1]
    #[arg(long)]
    coefficient: Option<Decimal>,

    /// Restatement index at the start of the period
    #[arg(long)]
    index_initial: Option<Decimal>,

    /// Restatement index at the end of the period
    #[arg(long)]
    index_final: Option<Decimal>,

    /// Hours worked in the period
    #[arg(long)]
    hours: Option<Decimal>,

    /// Depreciation per hour worked
    #[arg(long)]
    hourly_rate: Option<Decimal>,

    /// Accumulated depreciation carried in
    #[arg(long)]
    prior_accumulated: Option<Decimal>,

    /// Year label of the hourly evaluation period
    #[arg(long)]
    evaluation_year: Option<i32>,

    /// Usage factor for the effective hourly cost
    #[arg(long)]
    usage_factor: Option<Decimal>,

    /// Rounding policy: per-field or at-output
    #[arg(long)]
    rounding: Option<RoundingPolicy>,

    /// Clamping policy: silent or strict
    #[arg(long)]
    clamping: Option<ClampingPolicy>,

    /// Print the schedule as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write the schedule rows to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn raw_asset(&self) -> RawAsset {
        RawAsset {
            asset_id: self.asset_id.clone(),
            cost: self.cost,
            purchase_date: self.purchase_date.clone(),
            useful_life_years: self.life,
            residual_value: self.residual,
            method: self.method,
            method_label: self.label.clone(),
            coefficient: self.coefficient,
            index_initial: self.index_initial,
            index_final: self.index_final,
            hours_in_period: self.hours,
            hourly_rate: self.hourly_rate,
            prior_accumulated_depreciation: self.prior_accumulated,
            evaluation_year: self.evaluation_year,
        }
    }

    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::from_env().context("invalid DEPRECIATION_* environment")?;
        if let Some(factor) = self.usage_factor {
            config = config.with_usage_factor(factor)?;
        }
        if let Some(rounding) = self.rounding {
            config = config.with_rounding(rounding);
        }
        if let Some(clamping) = self.clamping {
            config = config.with_clamping(clamping);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let engine = ScheduleEngine::new(cli.engine_config()?);
    let schedule = engine
        .generate(&cli.raw_asset())
        .context("could not compute schedule")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        print_table(&schedule);
    }

    if let Some(path) = &cli.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        for row in schedule.to_rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        eprintln!("Schedule written to: {}", path.display());
    }

    Ok(())
}

fn print_table(schedule: &Schedule) {
    let d = schedule.descriptor();
    println!("Fleet Depreciation v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");
    println!("Asset:     {}", d.asset_id().unwrap_or("-"));
    println!("Method:    {}", schedule.method());
    println!("Cost:      {:.2}", d.cost());
    println!("Purchased: {}", d.purchase_date());
    println!("Residual:  {:.2}", d.residual_value());
    println!();

    if let Some(h) = schedule.hourly() {
        println!("{:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>10}",
            "Year", "Updated", "Increment", "AccumIdx", "Period", "TotalAccum", "Book", "Cost/h");
        println!("{}", "-".repeat(108));
        println!("{:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>10.2}",
            h.period.year,
            h.updated_asset_value,
            h.asset_value_increment,
            h.accumulated_depreciation_indexed,
            h.period_depreciation(),
            h.total_accumulated_depreciation(),
            h.ending_book_value(),
            h.effective_hourly_cost,
        );
    } else {
        println!("{:>6} {:>14} {:>14} {:>14}", "Year", "Annual", "Accumulated", "Book");
        println!("{}", "-".repeat(51));
        for r in schedule.records() {
            println!("{:>6} {:>14.2} {:>14.2} {:>14.2}",
                r.year, r.annual_depreciation, r.accumulated_depreciation, r.book_value);
        }
    }

    let summary = schedule.summary();
    println!("\nSummary:");
    println!("  Periods:            {}", summary.periods);
    println!("  Total depreciation: {:.2}", summary.total_depreciation);
    println!("  Final book value:   {:.2}", summary.final_book_value);

    if !schedule.warnings().is_empty() {
        println!("\nClamped values:");
        for w in schedule.warnings() {
            println!("  {}", w);
        }
    }
}
