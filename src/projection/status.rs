//! Status badge classification of an amount against the schedule

use serde::{Deserialize, Serialize};

use crate::schedule::TierSchedule;

/// Where an amount sits relative to the tier thresholds.
///
/// Uses the same inclusive lower bound as tier resolution, so the badge and
/// the computed rebate always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierStatus {
    /// Below the lowest threshold
    BelowLowest,
    /// At or above tier `lower`, below tier `upper` (schedule indices)
    Between { lower: usize, upper: usize },
    /// At or above the highest threshold
    TopAchieved,
}

/// Badge colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Amber,
    Green,
}

impl TierStatus {
    pub fn classify(amount: f64, schedule: &TierSchedule) -> Self {
        match schedule.achieved_index(amount) {
            None => TierStatus::BelowLowest,
            Some(i) if i + 1 >= schedule.len() => TierStatus::TopAchieved,
            Some(i) => TierStatus::Between {
                lower: i,
                upper: i + 1,
            },
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            TierStatus::BelowLowest => Severity::Red,
            TierStatus::Between { .. } => Severity::Amber,
            TierStatus::TopAchieved => Severity::Green,
        }
    }

    /// Badge text using the schedule's tier names
    pub fn label(&self, schedule: &TierSchedule) -> String {
        let name = |i: usize| schedule.get(i).map(|t| t.name.as_str()).unwrap_or("?");
        match *self {
            TierStatus::BelowLowest => format!("Trending to miss {}", schedule.lowest().name),
            TierStatus::Between { lower, upper } => {
                format!("Between {} and {}", name(lower), name(upper))
            }
            TierStatus::TopAchieved => format!("{} Achieved", schedule.highest().name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Tier;

    #[test]
    fn test_classify_demo_boundaries() {
        let s = TierSchedule::demo();
        assert_eq!(TierStatus::classify(1_412_730.0, &s), TierStatus::BelowLowest);
        assert_eq!(
            TierStatus::classify(3_350_000.0, &s),
            TierStatus::Between { lower: 0, upper: 1 }
        );
        assert_eq!(
            TierStatus::classify(3_849_999.0, &s),
            TierStatus::Between { lower: 0, upper: 1 }
        );
        assert_eq!(
            TierStatus::classify(3_850_000.0, &s),
            TierStatus::Between { lower: 1, upper: 2 }
        );
        assert_eq!(TierStatus::classify(4_350_000.0, &s), TierStatus::TopAchieved);
        assert_eq!(TierStatus::classify(-1.0, &s), TierStatus::BelowLowest);
    }

    #[test]
    fn test_labels_and_severity() {
        let s = TierSchedule::demo();
        assert_eq!(TierStatus::BelowLowest.label(&s), "Trending to miss Tier 1");
        assert_eq!(
            TierStatus::Between { lower: 0, upper: 1 }.label(&s),
            "Between Tier 1 and Tier 2"
        );
        assert_eq!(
            TierStatus::Between { lower: 1, upper: 2 }.label(&s),
            "Between Tier 2 and Tier 3"
        );
        assert_eq!(TierStatus::TopAchieved.label(&s), "Tier 3 Achieved");

        assert_eq!(TierStatus::BelowLowest.severity(), Severity::Red);
        assert_eq!(TierStatus::Between { lower: 0, upper: 1 }.severity(), Severity::Amber);
        assert_eq!(TierStatus::TopAchieved.severity(), Severity::Green);
    }

    #[test]
    fn test_single_tier_schedule() {
        let s = TierSchedule::new(vec![Tier::new("Only", 100.0)]).unwrap();
        assert_eq!(TierStatus::classify(99.0, &s), TierStatus::BelowLowest);
        assert_eq!(TierStatus::classify(100.0, &s), TierStatus::TopAchieved);
    }
}
