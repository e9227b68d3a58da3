//! Enterprise account records and lookup

mod data;
mod directory;
pub mod loader;

pub use data::{AccountContext, RebatePeriod};
pub use directory::{AccountDirectory, AccountLookup};
pub use loader::load_accounts;
