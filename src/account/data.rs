//! Enterprise account records and rebate measurement periods

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RebateError, RebateResult};

/// A rebate measurement period with inclusive start and end dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebatePeriod {
    /// Short label, e.g. "CY25 Q2"
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RebatePeriod {
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> RebateResult<Self> {
        let label = label.into();
        if end < start {
            return Err(RebateError::InvalidPeriod { label, start, end });
        }
        Ok(Self { label, start, end })
    }

    /// Calendar days in the period, both ends included
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Days elapsed through `as_of` (inclusive), clamped to [1, total_days]
    pub fn elapsed_days(&self, as_of: NaiveDate) -> i64 {
        ((as_of - self.start).num_days() + 1).clamp(1, self.total_days())
    }

    /// Days left after `as_of` until the period closes
    pub fn days_remaining(&self, as_of: NaiveDate) -> i64 {
        (self.end - as_of).num_days().clamp(0, self.total_days())
    }

    pub fn elapsed_fraction(&self, as_of: NaiveDate) -> f64 {
        self.elapsed_days(as_of) as f64 / self.total_days() as f64
    }

    /// Straight-line extrapolation of period-to-date purchases to the full period
    pub fn extrapolate_run_rate(&self, actual: f64, as_of: NaiveDate) -> f64 {
        (actual * self.total_days() as f64 / self.elapsed_days(as_of) as f64).round()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A customer account whose purchases are measured against the tier schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountContext {
    /// Lookup key ("banner")
    pub key: String,

    /// Display name ("Banner Health")
    pub name: String,

    /// Purchases to date in the current period
    pub current_actual: f64,

    /// Projected purchases for the full period
    pub run_rate: f64,

    /// Current measurement period
    pub period: RebatePeriod,

    /// Number of facilities covered by the agreement
    pub facilities: u32,

    pub contract_start: NaiveDate,
    pub contract_end: NaiveDate,

    /// Agreement type, e.g. "Tiered Annual"
    pub rebate_type: String,
}

impl AccountContext {
    /// Contract span as displayed on the dashboard ("Apr 2024 - Apr 2026")
    pub fn contract_label(&self) -> String {
        format!(
            "{} - {}",
            self.contract_start.format("%b %Y"),
            self.contract_end.format("%b %Y")
        )
    }
}
