//! Tiers and the tier schedule
//!
//! A schedule is an ascending list of volume thresholds, each unlocking its own
//! per-product rebate rates. It is validated once at construction and never
//! mutated afterwards; all engine calls borrow it read-only.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{RebateError, RebateResult};

/// Name of a product line, e.g. `Brady` or `CRT-P`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductKey(String);

impl ProductKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProductKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A volume threshold and the rebate rates it unlocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Display name ("Tier 1")
    pub name: String,

    /// Minimum purchase amount that achieves this tier (inclusive)
    pub threshold: f64,

    /// Rebate rate per product as a fraction (0.16 = 16%)
    rates: BTreeMap<ProductKey, f64>,
}

impl Tier {
    pub fn new(name: impl Into<String>, threshold: f64) -> Self {
        Self {
            name: name.into(),
            threshold,
            rates: BTreeMap::new(),
        }
    }

    /// Builder-style rate setter, rate given as a fraction
    pub fn with_rate(mut self, product: impl Into<ProductKey>, rate: f64) -> Self {
        self.rates.insert(product.into(), rate);
        self
    }

    pub(crate) fn set_rate(&mut self, product: ProductKey, rate: f64) {
        self.rates.insert(product, rate);
    }

    /// Rate for a product; products this tier does not define earn nothing
    pub fn rate(&self, product: &ProductKey) -> f64 {
        self.rates.get(product).copied().unwrap_or(0.0)
    }

    pub fn rates(&self) -> impl Iterator<Item = (&ProductKey, f64)> {
        self.rates.iter().map(|(k, &v)| (k, v))
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductKey> {
        self.rates.keys()
    }
}

/// Immutable, validated, ascending list of tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSchedule {
    tiers: Vec<Tier>,
}

impl TierSchedule {
    /// Validate and build a schedule.
    ///
    /// Tiers must be given in ascending order with strictly increasing,
    /// finite, non-negative thresholds and rates in [0, 1].
    pub fn new(tiers: Vec<Tier>) -> RebateResult<Self> {
        if tiers.is_empty() {
            return Err(RebateError::EmptySchedule);
        }

        let mut previous: Option<f64> = None;
        for tier in &tiers {
            if !tier.threshold.is_finite() || tier.threshold < 0.0 {
                return Err(RebateError::InvalidThreshold {
                    tier: tier.name.clone(),
                    threshold: tier.threshold,
                });
            }
            if let Some(prev) = previous {
                if tier.threshold <= prev {
                    return Err(RebateError::NonIncreasingThreshold {
                        tier: tier.name.clone(),
                        threshold: tier.threshold,
                        previous: prev,
                    });
                }
            }
            previous = Some(tier.threshold);

            for (product, rate) in tier.rates() {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(RebateError::RateOutOfRange {
                        tier: tier.name.clone(),
                        product: product.to_string(),
                        rate,
                    });
                }
            }
        }

        let schedule = Self { tiers };
        schedule.warn_on_partial_products();
        Ok(schedule)
    }

    /// The three-tier agreement shown on the demo dashboard
    pub fn demo() -> Self {
        let tiers = vec![
            Tier::new("Tier 1", 3_350_000.0)
                .with_rate("Brady", 0.06)
                .with_rate("CRT-P", 0.04)
                .with_rate("Tachy", 0.05)
                .with_rate("Micra VR", 0.05)
                .with_rate("Micra AV", 0.03),
            Tier::new("Tier 2", 3_850_000.0)
                .with_rate("Brady", 0.09)
                .with_rate("CRT-P", 0.07)
                .with_rate("Tachy", 0.05)
                .with_rate("Micra VR", 0.05)
                .with_rate("Micra AV", 0.03),
            Tier::new("Tier 3", 4_350_000.0)
                .with_rate("Brady", 0.16)
                .with_rate("CRT-P", 0.12)
                .with_rate("Tachy", 0.05)
                .with_rate("Micra VR", 0.05)
                .with_rate("Micra AV", 0.03),
        ];
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false for a validated schedule
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    pub fn lowest(&self) -> &Tier {
        &self.tiers[0]
    }

    pub fn highest(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// Index of the highest tier whose threshold is at or below `amount`
    pub fn achieved_index(&self, amount: f64) -> Option<usize> {
        // NaN compares false against everything and falls through to None
        self.tiers.iter().rposition(|t| amount >= t.threshold)
    }

    /// Union of products defined by any tier
    pub fn product_universe(&self) -> BTreeSet<ProductKey> {
        self.tiers
            .iter()
            .flat_map(|t| t.products().cloned())
            .collect()
    }

    fn warn_on_partial_products(&self) {
        let universe = self.product_universe();
        for tier in &self.tiers {
            for product in &universe {
                if !tier.rates.contains_key(product) {
                    warn!("{} defines no rate for {}; it will earn 0%", tier.name, product);
                }
            }
        }
    }
}
