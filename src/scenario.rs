//! Scenario runner for dashboard refreshes and batch projections
//!
//! Holds the configuration once and composes engine calls into the views the
//! dashboard shows: the per-account snapshot, uplift sweeps, and a batch over
//! every account.

use chrono::NaiveDate;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::account::{AccountContext, AccountLookup};
use crate::config::RebateConfig;
use crate::error::RebateResult;
use crate::projection::{
    ForecastBreakdown, ProjectionResult, RebateEngine, Severity, TierGap, TierOpportunity,
    TierStatus, WhatIfResult,
};
use crate::schedule::ProductMix;

/// Everything the rebate dashboard shows for one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub account_key: String,
    pub account_name: String,
    pub period_label: String,

    /// Date the snapshot is taken for
    pub as_of: NaiveDate,
    pub days_remaining: i64,

    /// Share of the period elapsed through `as_of`, 0..=1
    pub period_elapsed: f64,

    /// Purchases to date extrapolated straight-line to the period end
    pub extrapolated_run_rate: f64,

    pub facilities: u32,
    pub contract_period: String,
    pub rebate_type: String,

    /// Set when the requested key was unknown and the default account was used
    pub fallback_from: Option<String>,

    /// Projection at purchases to date
    pub current: ProjectionResult,

    /// Projection at the full-period run rate
    pub run_rate: ProjectionResult,

    /// Run rate with the what-if uplift applied
    pub what_if: WhatIfResult,

    pub status: TierStatus,
    pub status_label: String,
    pub severity: Severity,

    /// Gaps from purchases to date to each tier
    pub gaps: Vec<TierGap>,

    /// Next tier the run rate misses, measured from the run rate
    pub opportunity: Option<TierOpportunity>,

    /// Progress bar widths, percent
    pub current_progress: f64,
    pub run_rate_progress: f64,
}

/// Pre-loaded runner for dashboard and batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let as_of = NaiveDate::from_ymd_opt(2025, 5, 26).unwrap();
/// let snapshot = runner.snapshot_for_key("mayo", 30.0, &runner.config().default_mix, as_of);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: RebateConfig,
}

impl ScenarioRunner {
    /// Create runner with the in-memory demo configuration
    pub fn new() -> Self {
        Self {
            config: RebateConfig::demo(),
        }
    }

    /// Create runner by loading configuration from CSV files
    pub fn from_csv() -> RebateResult<Self> {
        Ok(Self {
            config: RebateConfig::from_csv()?,
        })
    }

    /// Create runner from a specific data directory
    pub fn from_csv_path(path: &std::path::Path) -> RebateResult<Self> {
        Ok(Self {
            config: RebateConfig::from_csv_path(path)?,
        })
    }

    pub fn with_config(config: RebateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RebateConfig {
        &self.config
    }

    pub fn engine(&self) -> RebateEngine<'_> {
        RebateEngine::new(&self.config.schedule)
    }

    /// Full dashboard refresh for one account as of a given date
    pub fn snapshot(
        &self,
        account: &AccountContext,
        uplift_percent: f64,
        mix: &ProductMix,
        as_of: NaiveDate,
    ) -> DashboardSnapshot {
        let engine = self.engine();
        let schedule = engine.schedule();
        let status = engine.status_badge(account.current_actual);
        let period = &account.period;
        if !period.contains(as_of) {
            debug!("{}: {} is outside period {}", account.key, as_of, period.label);
        }

        DashboardSnapshot {
            account_key: account.key.clone(),
            account_name: account.name.clone(),
            period_label: period.label.clone(),
            as_of,
            days_remaining: period.days_remaining(as_of),
            period_elapsed: period.elapsed_fraction(as_of),
            extrapolated_run_rate: period.extrapolate_run_rate(account.current_actual, as_of),
            facilities: account.facilities,
            contract_period: account.contract_label(),
            rebate_type: account.rebate_type.clone(),
            fallback_from: None,
            current: engine.project(account.current_actual, mix),
            run_rate: engine.project(account.run_rate, mix),
            what_if: engine.what_if(account.run_rate, uplift_percent, mix),
            status,
            status_label: status.label(schedule),
            severity: status.severity(),
            gaps: engine.tier_gaps(account.current_actual),
            opportunity: engine.next_tier_opportunity(account.run_rate, mix),
            current_progress: engine.progress_percent(account.current_actual),
            run_rate_progress: engine.progress_percent(account.run_rate),
        }
    }

    /// Snapshot for an account key; unknown keys use the default account
    pub fn snapshot_for_key(
        &self,
        key: &str,
        uplift_percent: f64,
        mix: &ProductMix,
        as_of: NaiveDate,
    ) -> DashboardSnapshot {
        let lookup = self.config.accounts.resolve(key);
        let mut snapshot = self.snapshot(lookup.account(), uplift_percent, mix, as_of);
        if let AccountLookup::Fallback { requested, .. } = lookup {
            snapshot.fallback_from = Some(requested.to_string());
        }
        snapshot
    }

    /// What-if projections of one run rate across several uplifts
    pub fn sweep_uplift(&self, run_rate: f64, uplifts: &[f64], mix: &ProductMix) -> Vec<WhatIfResult> {
        let engine = self.engine();
        uplifts
            .iter()
            .map(|&uplift| engine.what_if(run_rate, uplift, mix))
            .collect()
    }

    /// Snapshots for every account in the directory, in directory order
    pub fn run_accounts(&self, uplift_percent: f64, mix: &ProductMix, as_of: NaiveDate) -> Vec<DashboardSnapshot> {
        self.config
            .accounts
            .accounts()
            .par_iter()
            .map(|account| self.snapshot(account, uplift_percent, mix, as_of))
            .collect()
    }

    /// Forecast breakdown behind the "estimate" action: refused unless the
    /// mix totals exactly 100%
    pub fn estimate(&self, forecast_amount: f64, mix: &ProductMix) -> RebateResult<ForecastBreakdown> {
        mix.require_valid()?;
        Ok(self.engine().forecast_breakdown(forecast_amount, mix))
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
