//! Static account directory with an explicit default-account fallback
//!
//! Looking up a key that is not in the directory does not fail: it resolves to
//! the default account and says so through [`AccountLookup::Fallback`], so
//! callers (and tests) can tell a deliberate default apart from a match.

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use super::data::{AccountContext, RebatePeriod};
use crate::error::{RebateError, RebateResult};

/// Outcome of resolving an account key
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "lookup", rename_all = "snake_case")]
pub enum AccountLookup<'a> {
    /// The key matched an account
    Exact { account: &'a AccountContext },
    /// Unknown key; the default account was substituted
    Fallback {
        requested: &'a str,
        account: &'a AccountContext,
    },
}

impl<'a> AccountLookup<'a> {
    pub fn account(&self) -> &'a AccountContext {
        match *self {
            AccountLookup::Exact { account } => account,
            AccountLookup::Fallback { account, .. } => account,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AccountLookup::Fallback { .. })
    }
}

/// Ordered set of accounts; the first one is the default
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountDirectory {
    accounts: Vec<AccountContext>,
}

impl AccountDirectory {
    /// Build a directory. Keys must be unique; the first account is the default.
    pub fn new(accounts: Vec<AccountContext>) -> RebateResult<Self> {
        if accounts.is_empty() {
            return Err(RebateError::NoAccounts);
        }
        for (i, account) in accounts.iter().enumerate() {
            if accounts[..i]
                .iter()
                .any(|other| other.key.eq_ignore_ascii_case(&account.key))
            {
                return Err(RebateError::DuplicateAccount(account.key.clone()));
            }
        }
        Ok(Self { accounts })
    }

    /// The five enterprise accounts of the demo dashboard
    pub fn demo() -> Self {
        let q2 = RebatePeriod {
            label: "CY25 Q2".to_string(),
            start: ymd(2025, 4, 1),
            end: ymd(2025, 6, 30),
        };

        let account = |key: &str,
                       name: &str,
                       current_actual: f64,
                       run_rate: f64,
                       facilities: u32,
                       contract: (NaiveDate, NaiveDate),
                       rebate_type: &str| AccountContext {
            key: key.to_string(),
            name: name.to_string(),
            current_actual,
            run_rate,
            period: q2.clone(),
            facilities,
            contract_start: contract.0,
            contract_end: contract.1,
            rebate_type: rebate_type.to_string(),
        };

        Self {
            accounts: vec![
                account(
                    "banner",
                    "Banner Health",
                    1_412_730.0,
                    2_295_686.0,
                    325,
                    (ymd(2024, 4, 1), ymd(2026, 4, 1)),
                    "Tiered Annual",
                ),
                account(
                    "mayo",
                    "Mayo Clinic",
                    2_890_000.0,
                    3_450_000.0,
                    65,
                    (ymd(2024, 1, 1), ymd(2027, 1, 1)),
                    "Volume-Based",
                ),
                account(
                    "cleveland",
                    "Cleveland Clinic",
                    1_650_000.0,
                    2_475_000.0,
                    18,
                    (ymd(2024, 3, 1), ymd(2026, 3, 1)),
                    "Tiered Annual",
                ),
                account(
                    "kaiser",
                    "Kaiser Permanente",
                    4_125_000.0,
                    4_650_000.0,
                    39,
                    (ymd(2023, 7, 1), ymd(2026, 7, 1)),
                    "Performance-Based",
                ),
                account(
                    "intermountain",
                    "Intermountain Healthcare",
                    1_045_000.0,
                    1_568_000.0,
                    24,
                    (ymd(2024, 9, 1), ymd(2027, 9, 1)),
                    "Hybrid Model",
                ),
            ],
        }
    }

    pub fn accounts(&self) -> &[AccountContext] {
        &self.accounts
    }

    pub fn default_account(&self) -> &AccountContext {
        &self.accounts[0]
    }

    /// Exact (case-insensitive) lookup without fallback
    pub fn get(&self, key: &str) -> Option<&AccountContext> {
        let key = key.trim();
        self.accounts.iter().find(|a| a.key.eq_ignore_ascii_case(key))
    }

    /// Resolve a key, substituting the default account when it is unknown
    pub fn resolve<'a>(&'a self, key: &'a str) -> AccountLookup<'a> {
        match self.get(key) {
            Some(account) => AccountLookup::Exact { account },
            None => {
                let account = self.default_account();
                warn!("Unknown account '{}', using default '{}'", key, account.key);
                AccountLookup::Fallback {
                    requested: key,
                    account,
                }
            }
        }
    }
}

// Only called with literal calendar dates
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("literal date is valid")
}
