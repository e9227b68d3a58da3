//! Sweep the what-if uplift for one account and write the projections to CSV
//!
//! Usage: cargo run --bin uplift_sweep -- --account mayo --step 5

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use rebate_engine::projection::{UPLIFT_MAX, UPLIFT_MIN};
use rebate_engine::ScenarioRunner;

#[derive(Debug, Parser)]
#[command(about = "Project rebates across a range of what-if uplifts")]
struct Args {
    #[arg(long, default_value = "banner")]
    account: String,

    /// Uplift increment in percentage points
    #[arg(long, default_value_t = 5.0)]
    step: f64,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long, default_value = "uplift_sweep.csv")]
    output: PathBuf,
}

/// One row of the sweep output
#[derive(Debug, Serialize)]
struct SweepRow<'a> {
    uplift_pct: f64,
    forecast_amount: f64,
    tier: &'a str,
    blended_rate_pct: f64,
    rebate: f64,
}

/// Smallest accepted --step, in percentage points
const MIN_STEP: f64 = 0.01;

/// Uplifts from UPLIFT_MIN to UPLIFT_MAX in `step` increments
fn uplift_grid(step: f64) -> Result<Vec<f64>> {
    anyhow::ensure!(
        step >= MIN_STEP,
        "--step must be at least {} percentage points, got {}",
        MIN_STEP,
        step
    );
    let steps = ((UPLIFT_MAX - UPLIFT_MIN) / step).floor() as usize;
    Ok((0..=steps).map(|i| UPLIFT_MIN + i as f64 * step).collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let runner = match &args.data_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading rebate data from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    let lookup = runner.config().accounts.resolve(&args.account);
    let account = lookup.account();
    if lookup.is_fallback() {
        println!("Unknown account '{}', using {}", args.account, account.name);
    }

    let uplifts = uplift_grid(args.step)?;

    let mix = &runner.config().default_mix;
    let results = runner.sweep_uplift(account.run_rate, &uplifts, mix);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for result in &results {
        writer.serialize(SweepRow {
            uplift_pct: result.uplift_percent,
            forecast_amount: result.forecast_amount,
            tier: result.projection.tier_label(),
            blended_rate_pct: result.projection.blended_rate * 100.0,
            rebate: result.projection.rebate_value.round(),
        })?;
    }
    writer.flush()?;

    println!(
        "{}: run rate ${:.0}, {} scenarios written to {} in {:?}",
        account.name,
        account.run_rate,
        results.len(),
        args.output.display(),
        start.elapsed()
    );

    // First uplift that reaches each tier
    for tier in runner.config().schedule.tiers() {
        match results
            .iter()
            .find(|r| r.projection.tier_name() == Some(tier.name.as_str()))
        {
            Some(r) => println!("  {} first reached at +{}%", tier.name, r.uplift_percent),
            None => println!("  {} not reached within +{}%", tier.name, UPLIFT_MAX),
        }
    }

    Ok(())
}
