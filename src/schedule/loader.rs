//! CSV-based loader for tier rates and the default product mix
//!
//! Loads from data/rebate/ by default.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use super::mix::ProductMix;
use super::tier::{ProductKey, Tier, TierSchedule};
use crate::error::{RebateError, RebateResult};

/// Default path to the rebate data directory
pub const DEFAULT_DATA_PATH: &str = "data/rebate";

pub const TIER_RATES_FILE: &str = "tier_rates.csv";
pub const PRODUCT_MIX_FILE: &str = "product_mix.csv";

/// One row of tier_rates.csv (rates in percent)
#[derive(Debug, Deserialize)]
struct TierRateRow {
    tier: String,
    threshold: f64,
    product: String,
    rate_pct: f64,
}

/// One row of product_mix.csv
#[derive(Debug, Deserialize)]
struct MixRow {
    product: String,
    share_pct: f64,
}

/// Load the tier schedule from `<dir>/tier_rates.csv`
pub fn load_tier_schedule(path: &Path) -> RebateResult<TierSchedule> {
    let file = File::open(path.join(TIER_RATES_FILE))?;
    let schedule = load_tier_schedule_from_reader(file)?;
    info!(
        "Loaded {} tiers from {}",
        schedule.len(),
        path.join(TIER_RATES_FILE).display()
    );
    Ok(schedule)
}

/// Load a tier schedule from any CSV reader.
///
/// The file is long-format: one row per (tier, product). Tiers may appear in
/// any order; they are sorted by threshold before validation.
pub fn load_tier_schedule_from_reader<R: Read>(reader: R) -> RebateResult<TierSchedule> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut tiers: Vec<Tier> = Vec::new();

    for result in reader.deserialize() {
        let row: TierRateRow = result?;
        debug!("tier row: {:?}", row);

        let index = match tiers.iter().position(|t| t.name == row.tier) {
            Some(index) => {
                let first = tiers[index].threshold;
                if first != row.threshold {
                    return Err(RebateError::ConflictingThreshold {
                        tier: row.tier,
                        first,
                        second: row.threshold,
                    });
                }
                index
            }
            None => {
                tiers.push(Tier::new(row.tier.clone(), row.threshold));
                tiers.len() - 1
            }
        };
        tiers[index].set_rate(ProductKey::new(row.product), row.rate_pct / 100.0);
    }

    tiers.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
    TierSchedule::new(tiers)
}

/// Load the default product mix from `<dir>/product_mix.csv`
pub fn load_product_mix(path: &Path) -> RebateResult<ProductMix> {
    let file = File::open(path.join(PRODUCT_MIX_FILE))?;
    load_product_mix_from_reader(file)
}

pub fn load_product_mix_from_reader<R: Read>(reader: R) -> RebateResult<ProductMix> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut mix = ProductMix::new();

    for result in reader.deserialize() {
        let row: MixRow = result?;
        if !row.share_pct.is_finite() || row.share_pct < 0.0 {
            return Err(RebateError::MalformedMix(format!(
                "{}={}",
                row.product, row.share_pct
            )));
        }
        mix.set(row.product, row.share_pct);
    }

    Ok(mix)
}
