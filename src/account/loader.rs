//! Load enterprise accounts from accounts.csv

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use log::info;

use super::{AccountContext, AccountDirectory, RebatePeriod};
use crate::error::RebateResult;

pub const ACCOUNTS_FILE: &str = "accounts.csv";

/// Raw CSV row matching accounts.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    key: String,
    name: String,
    current_actual: f64,
    run_rate: f64,
    period_label: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
    facilities: u32,
    contract_start: NaiveDate,
    contract_end: NaiveDate,
    rebate_type: String,
}

impl CsvRow {
    fn into_account(self) -> RebateResult<AccountContext> {
        let period = RebatePeriod::new(self.period_label, self.period_start, self.period_end)?;
        Ok(AccountContext {
            key: self.key,
            name: self.name,
            current_actual: self.current_actual,
            run_rate: self.run_rate,
            period,
            facilities: self.facilities,
            contract_start: self.contract_start,
            contract_end: self.contract_end,
            rebate_type: self.rebate_type,
        })
    }
}

/// Load the account directory from `<dir>/accounts.csv`
pub fn load_accounts(path: &Path) -> RebateResult<AccountDirectory> {
    let file = File::open(path.join(ACCOUNTS_FILE))?;
    let directory = load_accounts_from_reader(file)?;
    info!("Loaded {} accounts", directory.accounts().len());
    Ok(directory)
}

pub fn load_accounts_from_reader<R: Read>(reader: R) -> RebateResult<AccountDirectory> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut accounts = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        accounts.push(row.into_account()?);
    }

    AccountDirectory::new(accounts)
}
