//! Product mix: how purchase volume splits across product lines
//!
//! Shares are held in percentage points (30.0 = 30%) and in the order the
//! caller supplied them. A mix is allowed to be invalid (not summing to 100%);
//! the engine still computes with it and reports the status so the caller can
//! gate confirmation actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tier::ProductKey;
use crate::error::{RebateError, RebateResult};

/// Allowed deviation from 100% before a mix is considered invalid
pub const MIX_TOLERANCE: f64 = 1e-6;

/// One product's share of the mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub product: ProductKey,
    /// Share in percentage points
    pub share: f64,
}

/// Ordered product mix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMix {
    entries: Vec<MixEntry>,
}

/// Whether a mix sums to 100%
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MixStatus {
    Valid,
    Under { total: f64 },
    Over { total: f64 },
}

impl MixStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, MixStatus::Valid)
    }

    /// Label shown next to the mix total
    pub fn label(&self) -> &'static str {
        match self {
            MixStatus::Valid => "Valid",
            MixStatus::Under { .. } => "Under 100%",
            MixStatus::Over { .. } => "Over 100%",
        }
    }
}

impl fmt::Display for MixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ProductMix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(product, percent)` pairs
    pub fn from_percentages<K: Into<ProductKey>>(shares: impl IntoIterator<Item = (K, f64)>) -> Self {
        let mut mix = Self::new();
        for (product, share) in shares {
            mix.set(product, share);
        }
        mix
    }

    /// Build from `(product, fraction)` pairs (0.3 = 30%)
    pub fn from_fractions<K: Into<ProductKey>>(shares: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self::from_percentages(shares.into_iter().map(|(k, f)| (k, f * 100.0)))
    }

    /// Default mix used by the demo dashboard
    pub fn demo() -> Self {
        Self::from_percentages([
            ("Brady", 30.0),
            ("CRT-P", 25.0),
            ("Tachy", 25.0),
            ("Micra VR", 15.0),
            ("Micra AV", 5.0),
        ])
    }

    /// Parse `"Brady=30,CRT-P=25"` (percent values)
    pub fn parse(input: &str) -> RebateResult<Self> {
        let mut mix = Self::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = part
                .rsplit_once('=')
                .ok_or_else(|| RebateError::MalformedMix(part.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(RebateError::MalformedMix(part.to_string()));
            }
            let share: f64 = value
                .trim()
                .trim_end_matches('%')
                .parse()
                .map_err(|_| RebateError::MalformedMix(part.to_string()))?;
            if !share.is_finite() || share < 0.0 {
                return Err(RebateError::MalformedMix(part.to_string()));
            }
            mix.set(name, share);
        }
        Ok(mix)
    }

    /// Set a product's share, replacing any existing entry in place
    pub fn set(&mut self, product: impl Into<ProductKey>, share: f64) {
        let product = product.into();
        match self.entries.iter_mut().find(|e| e.product == product) {
            Some(entry) => entry.share = share,
            None => self.entries.push(MixEntry { product, share }),
        }
    }

    pub fn share(&self, product: &ProductKey) -> f64 {
        self.entries
            .iter()
            .find(|e| &e.product == product)
            .map(|e| e.share)
            .unwrap_or(0.0)
    }

    pub fn entries(&self) -> &[MixEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of shares in percentage points
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.share).sum()
    }

    pub fn status(&self) -> MixStatus {
        let total = self.total();
        if (total - 100.0).abs() <= MIX_TOLERANCE {
            MixStatus::Valid
        } else if total < 100.0 {
            MixStatus::Under { total }
        } else {
            MixStatus::Over { total }
        }
    }

    /// Gate for confirmation actions: errors unless the mix totals 100%
    pub fn require_valid(&self) -> RebateResult<()> {
        match self.status() {
            MixStatus::Valid => Ok(()),
            MixStatus::Under { total } | MixStatus::Over { total } => {
                Err(RebateError::InvalidMix { total })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_demo_mix_is_valid() {
        let mix = ProductMix::demo();
        assert_eq!(mix.len(), 5);
        assert_relative_eq!(mix.total(), 100.0);
        assert!(mix.status().is_valid());
        assert!(mix.require_valid().is_ok());
        assert_eq!(mix.entries()[0].product.as_str(), "Brady");
    }

    #[test]
    fn test_from_fractions_matches_percentages() {
        let mix = ProductMix::from_fractions([("Brady", 0.3), ("Tachy", 0.7)]);
        assert_relative_eq!(mix.share(&"Brady".into()), 30.0, epsilon = 1e-12);
        assert_relative_eq!(mix.share(&"Tachy".into()), 70.0, epsilon = 1e-12);
        assert!(mix.status().is_valid());
    }

    #[test]
    fn test_under_and_over_status() {
        let under = ProductMix::from_percentages([("Brady", 30.0), ("CRT-P", 60.0)]);
        assert_eq!(under.status(), MixStatus::Under { total: 90.0 });
        assert_eq!(under.status().label(), "Under 100%");
        assert!(matches!(under.require_valid(), Err(RebateError::InvalidMix { .. })));

        let over = ProductMix::from_percentages([("Brady", 70.0), ("CRT-P", 60.0)]);
        assert_eq!(over.status().label(), "Over 100%");

        assert_eq!(ProductMix::new().status(), MixStatus::Under { total: 0.0 });
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut mix = ProductMix::demo();
        mix.set("Tachy", 10.0);
        assert_eq!(mix.len(), 5);
        assert_eq!(mix.entries()[2].share, 10.0);
        assert_eq!(mix.share(&"Unknown".into()), 0.0);
    }

    #[test]
    fn test_parse() {
        let mix = ProductMix::parse("Brady=30, CRT-P=25,Tachy=25%,Micra VR=15,Micra AV=5").unwrap();
        assert_eq!(mix, ProductMix::demo());

        assert!(ProductMix::parse("Brady").is_err());
        assert!(ProductMix::parse("Brady=abc").is_err());
        assert!(ProductMix::parse("=30").is_err());
        assert!(ProductMix::parse("Brady=-5").is_err());
        assert!(ProductMix::parse("").unwrap().is_empty());
    }
}
