//! Rebate Engine - Tiered volume rebate calculations for purchase agreements
//!
//! This library provides:
//! - Tier resolution against an ascending threshold schedule
//! - Product-mix blended rebate rates and rebate projections
//! - What-if uplift and forecast-with-editable-mix modes
//! - Status badges, tier gaps and next-tier opportunity tracking
//! - CSV-loaded agreement terms and demo enterprise accounts

pub mod error;
pub mod schedule;
pub mod account;
pub mod config;
pub mod projection;
pub mod format;
pub mod scenario;

// Re-export commonly used types
pub use error::{RebateError, RebateResult};
pub use schedule::{ProductKey, ProductMix, MixStatus, Tier, TierSchedule};
pub use account::{AccountContext, AccountDirectory, AccountLookup};
pub use config::RebateConfig;
pub use projection::{RebateEngine, ProjectionResult, WhatIfResult, ForecastBreakdown, TierStatus};
pub use scenario::{ScenarioRunner, DashboardSnapshot};
