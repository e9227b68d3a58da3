//! Rebate configuration: tier schedule, default product mix and accounts
//!
//! Loaded once at startup and treated as a constant input to every engine
//! call. There is no mutation path once built.

use std::path::Path;

use crate::account::{self, AccountDirectory};
use crate::error::RebateResult;
use crate::schedule::{loader, ProductMix, TierSchedule};

/// Container for all static rebate data
#[derive(Debug, Clone, PartialEq)]
pub struct RebateConfig {
    pub schedule: TierSchedule,
    pub default_mix: ProductMix,
    pub accounts: AccountDirectory,
}

impl RebateConfig {
    /// In-memory demo agreement matching data/rebate/
    pub fn demo() -> Self {
        Self {
            schedule: TierSchedule::demo(),
            default_mix: ProductMix::demo(),
            accounts: AccountDirectory::demo(),
        }
    }

    /// Load from CSV files in the default location (data/rebate/)
    pub fn from_csv() -> RebateResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_DATA_PATH))
    }

    /// Load from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> RebateResult<Self> {
        Ok(Self {
            schedule: loader::load_tier_schedule(path)?,
            default_mix: loader::load_product_mix(path)?,
            accounts: account::load_accounts(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RebateError;

    #[test]
    fn test_csv_matches_demo() {
        let loaded = RebateConfig::from_csv().unwrap();
        let demo = RebateConfig::demo();
        assert_eq!(loaded.default_mix, demo.default_mix);
        assert_eq!(loaded.accounts, demo.accounts);
        assert_eq!(loaded.schedule.len(), demo.schedule.len());
    }

    #[test]
    fn test_missing_directory() {
        let result = RebateConfig::from_csv_path(Path::new("data/does-not-exist"));
        assert!(matches!(result, Err(RebateError::Io(_))));
    }
}
