//! Rebate agreement terms: tier thresholds, per-product rates, product mix

mod tier;
mod mix;
pub mod loader;

pub use tier::{ProductKey, Tier, TierSchedule};
pub use mix::{MixEntry, MixStatus, ProductMix, MIX_TOLERANCE};
pub use loader::DEFAULT_DATA_PATH;
