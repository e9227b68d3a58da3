//! Error types for configuration loading and the estimate gate
//!
//! Business values never produce errors: amounts below every threshold simply
//! achieve no tier, and zero weights resolve to a zero rate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RebateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tier schedule has no tiers")]
    EmptySchedule,

    #[error("Tier {tier} threshold {threshold} is not above previous threshold {previous}")]
    NonIncreasingThreshold {
        tier: String,
        threshold: f64,
        previous: f64,
    },

    #[error("Tier {tier} has invalid threshold {threshold}")]
    InvalidThreshold { tier: String, threshold: f64 },

    #[error("Tier {tier} rate for {product} is outside [0, 1]: {rate}")]
    RateOutOfRange {
        tier: String,
        product: String,
        rate: f64,
    },

    #[error("Tier {tier} is listed with conflicting thresholds {first} and {second}")]
    ConflictingThreshold {
        tier: String,
        first: f64,
        second: f64,
    },

    #[error("Malformed product mix entry: {0}")]
    MalformedMix(String),

    #[error("Product mix totals {total}% (must be exactly 100%)")]
    InvalidMix { total: f64 },

    #[error("Period {label} ends ({end}) before it starts ({start})")]
    InvalidPeriod {
        label: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Account directory has no accounts")]
    NoAccounts,

    #[error("Duplicate account key: {0}")]
    DuplicateAccount(String),
}

/// Result type alias for rebate operations.
pub type RebateResult<T> = Result<T, RebateError>;
