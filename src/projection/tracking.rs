//! Tier tracking: gaps to each threshold, next-tier opportunity, progress bar scale

use super::engine::RebateEngine;
use super::results::{TierGap, TierOpportunity};
use crate::schedule::ProductMix;

/// Progress bars run to the top threshold plus this headroom
pub const PROGRESS_HEADROOM: f64 = 1.15;

/// Minimum displayed width of a progress bar, in percent
pub const PROGRESS_FLOOR: f64 = 5.0;

impl<'a> RebateEngine<'a> {
    /// Remaining purchases needed for every tier, lowest first
    pub fn tier_gaps(&self, amount: f64) -> Vec<TierGap> {
        self.schedule()
            .tiers()
            .iter()
            .map(|tier| TierGap {
                tier_name: tier.name.clone(),
                threshold: tier.threshold,
                gap: (tier.threshold - amount).max(0.0),
                achieved: amount >= tier.threshold,
            })
            .collect()
    }

    /// The lowest tier not yet reached, what it would take, and what it pays.
    ///
    /// None once the top tier is achieved.
    pub fn next_tier_opportunity(&self, amount: f64, mix: &ProductMix) -> Option<TierOpportunity> {
        let schedule = self.schedule();
        let next = match schedule.achieved_index(amount) {
            Some(i) => i + 1,
            None => 0,
        };
        let tier = schedule.get(next)?;

        let gap = if amount.is_finite() {
            (tier.threshold - amount.max(0.0)).max(0.0)
        } else {
            tier.threshold
        };
        let increase_percent = if amount > 0.0 {
            Some(gap / amount * 100.0)
        } else {
            None
        };

        Some(TierOpportunity {
            tier_name: tier.name.clone(),
            threshold: tier.threshold,
            gap,
            increase_percent,
            rebate_at_threshold: self.project(tier.threshold, mix).rebate_value,
        })
    }

    /// Width of a tier progress bar for `amount`, in percent of the scale
    pub fn progress_percent(&self, amount: f64) -> f64 {
        let scale = self.schedule().highest().threshold * PROGRESS_HEADROOM;
        if scale <= 0.0 || amount.is_nan() {
            return PROGRESS_FLOOR;
        }
        (amount / scale * 100.0).clamp(PROGRESS_FLOOR, 100.0)
    }
}
