//! Output structures for rebate projections
//!
//! Every result is a plain value built fresh per call.

use serde::{Deserialize, Serialize};

use crate::schedule::{MixStatus, ProductKey, Tier};

/// Tier, blended rate and rebate for one purchase amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Purchase amount the projection was computed for
    pub amount: f64,

    /// Highest tier reached, if any
    pub achieved_tier: Option<Tier>,

    /// Mix-weighted rate at the achieved tier (fraction)
    pub blended_rate: f64,

    /// amount × blended_rate
    pub rebate_value: f64,
}

impl ProjectionResult {
    pub fn tier_name(&self) -> Option<&str> {
        self.achieved_tier.as_ref().map(|t| t.name.as_str())
    }

    /// Tier name or "None", as shown in tier outcome fields
    pub fn tier_label(&self) -> &str {
        self.tier_name().unwrap_or("None")
    }
}

/// Projection of the run rate scaled up by a what-if uplift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResult {
    pub base_run_rate: f64,

    /// Uplift in percent (30.0 = +30%)
    pub uplift_percent: f64,

    /// round(base_run_rate × (1 + uplift/100))
    pub forecast_amount: f64,

    pub projection: ProjectionResult,
}

/// One product's line in a forecast breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRebate {
    pub product: ProductKey,

    /// Share of the forecast in percent
    pub share: f64,

    /// forecast × share
    pub product_amount: f64,

    /// Rate at the achieved tier (0 with no tier)
    pub rate: f64,

    /// product_amount × rate
    pub rebate: f64,
}

/// Forecast amount split across an editable product mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBreakdown {
    pub forecast_amount: f64,
    pub tier: Option<Tier>,
    pub total_rebate: f64,

    /// total_rebate / forecast_amount (fraction, 0 for a zero forecast)
    pub effective_rate: f64,

    /// In mix order
    pub per_product: Vec<ProductRebate>,

    /// Validity of the mix used; callers gate estimate actions on this
    pub mix_status: MixStatus,
}

impl ForecastBreakdown {
    pub fn tier_label(&self) -> &str {
        self.tier.as_ref().map(|t| t.name.as_str()).unwrap_or("None")
    }
}

/// Distance from an amount to one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierGap {
    pub tier_name: String,
    pub threshold: f64,

    /// max(0, threshold − amount)
    pub gap: f64,
    pub achieved: bool,
}

/// What it takes to reach the next unachieved tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierOpportunity {
    pub tier_name: String,
    pub threshold: f64,
    pub gap: f64,

    /// Purchase increase needed, in percent of the current amount.
    /// None when the current amount is zero or negative.
    pub increase_percent: Option<f64>,

    /// Rebate earned at exactly the threshold with the given mix
    pub rebate_at_threshold: f64,
}
