//! Rebate projection engine and its result types

mod engine;
mod results;
mod status;
mod tracking;

pub use engine::{clamp_uplift, RebateEngine, UPLIFT_MAX, UPLIFT_MIN};
pub use results::{
    ForecastBreakdown, ProductRebate, ProjectionResult, TierGap, TierOpportunity, WhatIfResult,
};
pub use status::{Severity, TierStatus};
pub use tracking::{PROGRESS_FLOOR, PROGRESS_HEADROOM};
