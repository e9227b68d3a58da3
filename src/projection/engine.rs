//! Core rebate engine: tier resolution, blended rates, what-if and forecast modes
//!
//! Every operation is a pure function of its arguments and the borrowed
//! schedule. Nothing is cached or mutated, so repeated calls with the same
//! inputs return bit-identical results.

use log::debug;

use super::results::{ForecastBreakdown, ProductRebate, ProjectionResult, WhatIfResult};
use super::status::TierStatus;
use crate::schedule::{ProductMix, Tier, TierSchedule};

/// Lower bound of the what-if uplift control, in percent
pub const UPLIFT_MIN: f64 = 0.0;

/// Upper bound of the what-if uplift control, in percent
pub const UPLIFT_MAX: f64 = 100.0;

/// Clamp a UI-supplied uplift to the control's bounds.
///
/// The engine itself never clamps; this is offered to presentation code.
pub fn clamp_uplift(uplift_percent: f64) -> f64 {
    if uplift_percent.is_nan() {
        return UPLIFT_MIN;
    }
    uplift_percent.clamp(UPLIFT_MIN, UPLIFT_MAX)
}

/// Rebate engine over a borrowed, immutable tier schedule
#[derive(Debug, Clone, Copy)]
pub struct RebateEngine<'a> {
    schedule: &'a TierSchedule,
}

impl<'a> RebateEngine<'a> {
    pub fn new(schedule: &'a TierSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &'a TierSchedule {
        self.schedule
    }

    /// Highest tier whose threshold is at or below `amount`.
    ///
    /// Amounts below the lowest threshold (including negative amounts) reach
    /// no tier, which is a normal outcome meaning zero rebate.
    pub fn resolve_tier(&self, amount: f64) -> Option<&'a Tier> {
        self.schedule
            .achieved_index(amount)
            .and_then(|i| self.schedule.get(i))
    }

    /// Mix-weighted average rate at `tier`.
    ///
    /// Weighted mean Σ(share × rate) / Σ(share) over the products in the mix,
    /// so scaling every share leaves the result unchanged. Products the tier
    /// does not define earn 0. No tier, or a mix with zero total weight,
    /// yields 0. Negative shares are treated as zero weight.
    pub fn blended_rate(&self, tier: Option<&Tier>, mix: &ProductMix) -> f64 {
        let tier = match tier {
            Some(tier) => tier,
            None => return 0.0,
        };

        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for entry in mix.entries() {
            let weight = entry.share.max(0.0);
            weighted += weight * tier.rate(&entry.product);
            total_weight += weight;
        }

        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }

    /// Tier, blended rate and rebate value for a purchase amount
    pub fn project(&self, amount: f64, mix: &ProductMix) -> ProjectionResult {
        let tier = self.resolve_tier(amount);
        let blended_rate = self.blended_rate(tier, mix);
        let rebate_value = if tier.is_some() { amount * blended_rate } else { 0.0 };

        debug!(
            "project amount={} tier={:?} rate={:.6} value={:.2}",
            amount,
            tier.map(|t| t.name.as_str()),
            blended_rate,
            rebate_value
        );

        ProjectionResult {
            amount,
            achieved_tier: tier.cloned(),
            blended_rate,
            rebate_value,
        }
    }

    /// Project the run rate scaled by `uplift_percent`.
    ///
    /// The forecast is rounded to a whole amount (half away from zero). The
    /// uplift is not clamped here; see [`clamp_uplift`].
    pub fn what_if(&self, base_run_rate: f64, uplift_percent: f64, mix: &ProductMix) -> WhatIfResult {
        let forecast_amount = (base_run_rate * (1.0 + uplift_percent / 100.0)).round();
        WhatIfResult {
            base_run_rate,
            uplift_percent,
            forecast_amount,
            projection: self.project(forecast_amount, mix),
        }
    }

    /// Split a forecast across the mix and compute each product's rebate.
    ///
    /// A result is produced even when the mix does not total 100%; the
    /// returned `mix_status` tells the caller whether to allow estimate
    /// actions.
    pub fn forecast_breakdown(&self, forecast_amount: f64, mix: &ProductMix) -> ForecastBreakdown {
        let tier = self.resolve_tier(forecast_amount);

        let per_product: Vec<ProductRebate> = mix
            .entries()
            .iter()
            .map(|entry| {
                let share = entry.share.max(0.0);
                let product_amount = forecast_amount * share / 100.0;
                let rate = tier.map(|t| t.rate(&entry.product)).unwrap_or(0.0);
                ProductRebate {
                    product: entry.product.clone(),
                    share,
                    product_amount,
                    rate,
                    rebate: product_amount * rate,
                }
            })
            .collect();

        let total_rebate: f64 = per_product.iter().map(|p| p.rebate).sum();
        let effective_rate = if forecast_amount > 0.0 {
            total_rebate / forecast_amount
        } else {
            0.0
        };

        ForecastBreakdown {
            forecast_amount,
            tier: tier.cloned(),
            total_rebate,
            effective_rate,
            per_product,
            mix_status: mix.status(),
        }
    }

    /// Badge classification, consistent with [`Self::resolve_tier`]
    pub fn status_badge(&self, amount: f64) -> TierStatus {
        TierStatus::classify(amount, self.schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{MixStatus, ProductKey};
    use approx::assert_relative_eq;

    fn engine_fixture() -> TierSchedule {
        TierSchedule::demo()
    }

    #[test]
    fn test_resolve_tier_boundaries() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);

        assert!(engine.resolve_tier(0.0).is_none());
        assert!(engine.resolve_tier(1_412_730.0).is_none());
        assert!(engine.resolve_tier(-250_000.0).is_none());

        // Inclusive lower bound
        assert_eq!(engine.resolve_tier(3_350_000.0).unwrap().name, "Tier 1");
        assert_eq!(engine.resolve_tier(3_849_999.99).unwrap().name, "Tier 1");
        assert_eq!(engine.resolve_tier(3_850_000.0).unwrap().name, "Tier 2");
        assert_eq!(engine.resolve_tier(4_350_000.0).unwrap().name, "Tier 3");
        assert_eq!(engine.resolve_tier(9_000_000.0).unwrap().name, "Tier 3");
    }

    #[test]
    fn test_below_lowest_tier_is_zero() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let mix = ProductMix::demo();

        for amount in [0.0, 1.0, 1_412_730.0, 3_349_999.0, -10.0] {
            let result = engine.project(amount, &mix);
            assert!(result.achieved_tier.is_none());
            assert_eq!(result.blended_rate, 0.0);
            assert_eq!(result.rebate_value, 0.0);
            assert_eq!(result.tier_label(), "None");
        }
    }

    #[test]
    fn test_tier3_demo_projection() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);

        let result = engine.project(4_350_000.0, &ProductMix::demo());
        assert_eq!(result.tier_name(), Some("Tier 3"));
        assert_relative_eq!(result.blended_rate, 0.0995, epsilon = 1e-12);
        assert_relative_eq!(result.rebate_value, 432_825.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tier1_blended_rate() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);

        // 0.3×6% + 0.25×4% + 0.25×5% + 0.15×5% + 0.05×3%
        let rate = engine.blended_rate(schedule.get(0), &ProductMix::demo());
        assert_relative_eq!(rate, 0.0495, epsilon = 1e-12);
    }

    #[test]
    fn test_blended_rate_scale_invariant() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let tier = schedule.get(2);

        let mix = ProductMix::demo();
        let doubled = ProductMix::from_percentages(
            mix.entries().iter().map(|e| (e.product.clone(), e.share * 2.0)),
        );
        let as_fractions = ProductMix::from_fractions([
            ("Brady", 0.30),
            ("CRT-P", 0.25),
            ("Tachy", 0.25),
            ("Micra VR", 0.15),
            ("Micra AV", 0.05),
        ]);

        let base = engine.blended_rate(tier, &mix);
        assert_relative_eq!(engine.blended_rate(tier, &doubled), base, epsilon = 1e-15);
        assert_relative_eq!(engine.blended_rate(tier, &as_fractions), base, epsilon = 1e-15);
    }

    #[test]
    fn test_blended_rate_zero_weight_guard() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let tier = schedule.get(2);

        assert_eq!(engine.blended_rate(tier, &ProductMix::new()), 0.0);

        let all_zero = ProductMix::from_percentages([("Brady", 0.0), ("CRT-P", 0.0)]);
        let rate = engine.blended_rate(tier, &all_zero);
        assert_eq!(rate, 0.0);
        assert!(!rate.is_nan());

        assert_eq!(engine.blended_rate(None, &ProductMix::demo()), 0.0);
    }

    #[test]
    fn test_zero_share_and_unknown_products() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let tier = schedule.get(2);

        // Brady (16%) at 0% share contributes nothing
        let mix = ProductMix::from_percentages([("Brady", 0.0), ("Tachy", 100.0)]);
        assert_relative_eq!(engine.blended_rate(tier, &mix), 0.05, epsilon = 1e-12);

        // A product no tier defines dilutes the blend at rate 0
        let mix = ProductMix::from_percentages([("Tachy", 50.0), ("Linq", 50.0)]);
        assert_relative_eq!(engine.blended_rate(tier, &mix), 0.025, epsilon = 1e-12);
        assert_eq!(tier.unwrap().rate(&ProductKey::from("Linq")), 0.0);
    }

    #[test]
    fn test_breakdown_negative_share_reported_as_zero() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let mix = ProductMix::from_percentages([("Brady", -10.0), ("Tachy", 110.0)]);

        let breakdown = engine.forecast_breakdown(4_350_000.0, &mix);
        let brady = &breakdown.per_product[0];
        assert_eq!(brady.share, 0.0);
        assert_eq!(brady.product_amount, 0.0);
        assert_eq!(brady.rebate, 0.0);
        assert_eq!(breakdown.per_product[1].share, 110.0);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let mix = ProductMix::from_percentages([("Brady", 33.3), ("CRT-P", 41.1), ("Micra AV", 25.6)]);

        for amount in [3_350_000.0, 3_987_654.32, 4_350_000.0] {
            let a = engine.project(amount, &mix);
            let b = engine.project(amount, &mix);
            assert_eq!(a.blended_rate.to_bits(), b.blended_rate.to_bits());
            assert_eq!(a.rebate_value.to_bits(), b.rebate_value.to_bits());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_what_if_below_tier() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);

        let result = engine.what_if(2_295_686.0, 30.0, &ProductMix::demo());
        assert_eq!(result.forecast_amount, 2_984_392.0);
        assert!(result.projection.achieved_tier.is_none());
        assert_eq!(result.projection.rebate_value, 0.0);
    }

    #[test]
    fn test_what_if_reaches_tier() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let mix = ProductMix::demo();

        // 2,295,686 × 1.46 = 3,351,701.56 → 3,351,702
        let result = engine.what_if(2_295_686.0, 46.0, &mix);
        assert_eq!(result.forecast_amount, 3_351_702.0);
        assert_eq!(result.projection.tier_name(), Some("Tier 1"));
        assert_eq!(result.projection, engine.project(3_351_702.0, &mix));

        // Zero uplift projects the run rate itself
        let flat = engine.what_if(4_650_000.0, 0.0, &mix);
        assert_eq!(flat.forecast_amount, 4_650_000.0);
        assert_eq!(flat.projection.tier_name(), Some("Tier 3"));
    }

    #[test]
    fn test_clamp_uplift() {
        assert_eq!(clamp_uplift(-5.0), 0.0);
        assert_eq!(clamp_uplift(30.0), 30.0);
        assert_eq!(clamp_uplift(250.0), 100.0);
        assert_eq!(clamp_uplift(f64::NAN), 0.0);
    }

    #[test]
    fn test_forecast_breakdown_tier3() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);

        let breakdown = engine.forecast_breakdown(4_350_000.0, &ProductMix::demo());
        assert_eq!(breakdown.tier_label(), "Tier 3");
        assert_eq!(breakdown.mix_status, MixStatus::Valid);
        assert_eq!(breakdown.per_product.len(), 5);

        let brady = &breakdown.per_product[0];
        assert_eq!(brady.product.as_str(), "Brady");
        assert_relative_eq!(brady.product_amount, 1_305_000.0, epsilon = 1e-6);
        assert_relative_eq!(brady.rate, 0.16);
        assert_relative_eq!(brady.rebate, 208_800.0, epsilon = 1e-6);

        assert_relative_eq!(breakdown.total_rebate, 432_825.0, epsilon = 1e-6);
        assert_relative_eq!(breakdown.effective_rate, 0.0995, epsilon = 1e-12);
    }

    #[test]
    fn test_forecast_breakdown_invalid_mix_still_computes() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let mix = ProductMix::from_percentages([
            ("Brady", 30.0),
            ("CRT-P", 25.0),
            ("Tachy", 25.0),
            ("Micra VR", 10.0),
        ]);

        let breakdown = engine.forecast_breakdown(4_350_000.0, &mix);
        assert_eq!(breakdown.mix_status.label(), "Under 100%");
        assert!(!breakdown.mix_status.is_valid());

        // 1,305,000×16% + 1,087,500×12% + 1,087,500×5% + 435,000×5%
        assert_relative_eq!(breakdown.total_rebate, 415_425.0, epsilon = 1e-6);
        assert!(breakdown.effective_rate > 0.0);
    }

    #[test]
    fn test_forecast_breakdown_no_tier_and_zero_forecast() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);
        let mix = ProductMix::demo();

        let below = engine.forecast_breakdown(1_000_000.0, &mix);
        assert!(below.tier.is_none());
        assert_eq!(below.total_rebate, 0.0);
        assert_eq!(below.effective_rate, 0.0);
        assert_relative_eq!(below.per_product[0].product_amount, 300_000.0);
        assert!(below.per_product.iter().all(|p| p.rate == 0.0));

        let zero = engine.forecast_breakdown(0.0, &mix);
        assert_eq!(zero.effective_rate, 0.0);
        assert!(!zero.effective_rate.is_nan());
    }

    #[test]
    fn test_status_badge_matches_resolution() {
        let schedule = engine_fixture();
        let engine = RebateEngine::new(&schedule);

        for amount in [0.0, 3_349_999.0, 3_350_000.0, 3_850_000.0, 4_349_999.0, 4_350_000.0] {
            let status = engine.status_badge(amount);
            match engine.resolve_tier(amount) {
                None => assert_eq!(status, TierStatus::BelowLowest),
                Some(t) if t.name == "Tier 3" => assert_eq!(status, TierStatus::TopAchieved),
                Some(t) => match status {
                    TierStatus::Between { lower, .. } => {
                        assert_eq!(schedule.get(lower).unwrap().name, t.name)
                    }
                    other => panic!("unexpected status {:?} for {}", other, amount),
                },
            }
        }
    }
}
