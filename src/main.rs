//! Rebate CLI
//!
//! Prints the rebate dashboard for one account, optionally with a forecast
//! breakdown for an explicit forecast amount and product mix.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::info;

use rebate_engine::format::{format_compact_currency, format_currency, format_percent};
use rebate_engine::projection::clamp_uplift;
use rebate_engine::{DashboardSnapshot, ForecastBreakdown, ProductMix, ScenarioRunner};

#[derive(Debug, Parser)]
#[command(name = "rebate", version, about = "Tiered rebate dashboard calculations")]
struct Args {
    /// Directory holding tier_rates.csv, product_mix.csv and accounts.csv.
    /// Uses the built-in demo agreement when omitted.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enterprise account key (unknown keys fall back to the default account)
    #[arg(long, default_value = "banner")]
    account: String,

    /// What-if uplift on the run rate, in percent (clamped to 0-100)
    #[arg(long, default_value_t = 0.0)]
    uplift: f64,

    /// Snapshot date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Forecast purchase amount for a per-product breakdown
    #[arg(long)]
    forecast: Option<f64>,

    /// Product mix override, e.g. "Brady=30,CRT-P=25,Tachy=25,Micra VR=15,Micra AV=5"
    #[arg(long)]
    mix: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct Report<'a> {
    dashboard: &'a DashboardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<&'a ForecastBreakdown>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let runner = match &args.data_dir {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading rebate data from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    let mix = match &args.mix {
        Some(raw) => ProductMix::parse(raw).context("parsing --mix")?,
        None => runner.config().default_mix.clone(),
    };

    let uplift = clamp_uplift(args.uplift);
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    info!(
        "account={} uplift={} as_of={} forecast={:?}",
        args.account, uplift, as_of, args.forecast
    );

    let snapshot = runner.snapshot_for_key(&args.account, uplift, &mix, as_of);
    let breakdown = args
        .forecast
        .map(|amount| runner.engine().forecast_breakdown(amount, &mix));

    if args.json {
        let report = Report {
            dashboard: &snapshot,
            forecast: breakdown.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_dashboard(&snapshot);
    if let Some(breakdown) = &breakdown {
        print_breakdown(breakdown);
    }
    Ok(())
}

fn print_dashboard(s: &DashboardSnapshot) {
    println!("Rebate Dashboard - {} ({})", s.account_name, s.period_label);
    println!("{}", "=".repeat(60));
    if let Some(requested) = &s.fallback_from {
        println!("  (unknown account '{}', showing default)", requested);
    }
    println!(
        "  Contract:         {} | {} | {} facilities",
        s.contract_period, s.rebate_type, s.facilities
    );
    println!(
        "  Period:           {} days remaining as of {} ({:.0}% elapsed)",
        s.days_remaining,
        s.as_of,
        s.period_elapsed * 100.0
    );
    println!("  Status:           {}", s.status_label);
    println!(
        "  Current:          {} -> {} at {}",
        format_currency(s.current.amount),
        s.current.tier_label(),
        format_percent(s.current.blended_rate, 1)
    );
    println!(
        "  Run rate:         {} (straight-line from to-date: {})",
        format_currency(s.run_rate.amount),
        format_currency(s.extrapolated_run_rate)
    );
    println!(
        "  Projected rebate: {} ({} | Blended {})",
        format_compact_currency(s.run_rate.rebate_value.round()),
        s.run_rate.tier_label(),
        format_percent(s.run_rate.blended_rate, 1)
    );
    println!(
        "  Progress:         current {:.1}% | run rate {:.1}%",
        s.current_progress, s.run_rate_progress
    );

    println!("\nWhat-if (+{}%):", s.what_if.uplift_percent);
    println!("  Forecast amount:  {}", format_compact_currency(s.what_if.forecast_amount));
    println!(
        "  Projected rebate: {}",
        format_compact_currency(s.what_if.projection.rebate_value.round())
    );
    println!("  Tier outcome:     {}", s.what_if.projection.tier_label());

    println!("\nTier gaps:");
    for gap in &s.gaps {
        let detail = if gap.achieved {
            "Achieved".to_string()
        } else {
            format!("Gap: {}", format_compact_currency(gap.gap))
        };
        println!(
            "  {:<8} {:>12}  {}",
            gap.tier_name,
            format_currency(gap.threshold),
            detail
        );
    }

    match &s.opportunity {
        Some(opp) => match opp.increase_percent {
            Some(pct) => println!(
                "\n{:.0}% increase over run rate needed to unlock {} in rebates ({})",
                pct,
                format_compact_currency(opp.rebate_at_threshold),
                opp.tier_name
            ),
            None => println!(
                "\n{} in purchases needed to unlock {} in rebates ({})",
                format_compact_currency(opp.gap),
                format_compact_currency(opp.rebate_at_threshold),
                opp.tier_name
            ),
        },
        None => println!("\nRun rate reaches the top tier"),
    }
}

fn print_breakdown(b: &ForecastBreakdown) {
    println!("\nForecast breakdown for {}:", format_currency(b.forecast_amount));
    println!("  {:<12} {:>6} {:>14} {:>7} {:>12}", "Product", "Share", "Amount", "Rate", "Rebate");
    println!("  {}", "-".repeat(55));
    for p in &b.per_product {
        println!(
            "  {:<12} {:>5}% {:>14} {:>7} {:>12}",
            p.product.as_str(),
            p.share,
            format_currency(p.product_amount),
            format_percent(p.rate, 1),
            format_currency(p.rebate)
        );
    }
    println!("  {}", "-".repeat(55));
    println!("  Tier outcome:     {}", b.tier_label());
    println!("  Total rebate:     {}", format_currency(b.total_rebate));
    println!("  Effective rate:   {}", format_percent(b.effective_rate, 2));
    println!(
        "  Mix:              {} ({})",
        b.mix_status,
        if b.mix_status.is_valid() { "estimate enabled" } else { "estimate disabled" }
    );
}
